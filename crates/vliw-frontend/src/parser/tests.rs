use vliw_common::inst::{Instruction, MovSource, Op, Register};
use vliw_common::message::{Messages, Span};

use super::operand::{parse_immediate, parse_register};
use super::parse_lines;

fn parse(lines: &[&str]) -> Result<Vec<Instruction>, Messages> {
    let lines: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
    let mut messages = Messages::new();
    let mut spans = Vec::new();

    parse_lines(&mut messages, &mut spans, 0, &lines).ok_or(messages)
}

fn parse_one(line: &str) -> Op {
    let insts = parse(&[line]).unwrap();
    assert_eq!(1, insts.len());
    insts[0].op
}

fn error_code(lines: &[&str]) -> String {
    let messages = parse(lines).unwrap_err();
    assert_eq!(1, messages.msgs.len());
    messages.codes()[0].to_string()
}

fn x(n: u32) -> Register {
    Register::General(n)
}

#[test]
fn parse_arithmetic() {
    assert_eq!(
        Op::Add {
            dst: x(3),
            lhs: x(1),
            rhs: x(2)
        },
        parse_one("add x3,x1,x2")
    );

    assert_eq!(
        Op::Mulu {
            dst: x(4),
            lhs: x(3),
            rhs: x(1)
        },
        parse_one("  mulu x4 , x3 ,x1 ")
    );

    assert_eq!(
        Op::Addi {
            dst: x(1),
            src: x(0),
            imm: -10
        },
        parse_one("addi x1, x0, -10")
    );
}

#[test]
fn parse_memory() {
    assert_eq!(
        Op::Ld {
            dst: x(3),
            offset: 8,
            base: x(2)
        },
        parse_one("ld x3, 8(x2)")
    );

    assert_eq!(
        Op::St {
            src: x(4),
            offset: -0x10,
            base: x(95)
        },
        parse_one("st x4, -0x10( x95 )")
    );
}

#[test]
fn parse_moves() {
    assert_eq!(
        Op::Mov {
            dst: x(1),
            src: MovSource::Register(x(2))
        },
        parse_one("mov x1, x2")
    );

    assert_eq!(
        Op::Mov {
            dst: x(1),
            src: MovSource::Immediate(0b101)
        },
        parse_one("mov x1, 0b101")
    );

    assert_eq!(
        Op::Mov {
            dst: Register::Predicate(32),
            src: MovSource::Predicate(true)
        },
        parse_one("mov p32, true")
    );

    assert_eq!(
        Op::Mov {
            dst: Register::LoopCount,
            src: MovSource::Immediate(100)
        },
        parse_one("mov LC, 100")
    );
}

#[test]
fn parse_branches_and_nop() {
    assert_eq!(Op::Loop { target: 2 }, parse_one("loop 2"));
    assert_eq!(Op::LoopPip { target: 0 }, parse_one("loop.pip 0"));
    assert_eq!(Op::Nop, parse_one("nop"));
}

#[test]
fn parse_assigns_pcs() {
    let insts = parse(&["nop", "addi x1, x0, 1", "nop"]).unwrap();
    let pcs: Vec<_> = insts.iter().map(|inst| inst.pc).collect();

    assert_eq!(vec![Some(0), Some(1), Some(2)], pcs);
}

#[test]
fn parse_reports_each_reason() {
    assert_eq!("EP00", error_code(&["jmp 3"]));
    assert_eq!("EP00", error_code(&[""]));
    assert_eq!("EP01", error_code(&["add x96, x1, x2"]));
    assert_eq!("EP01", error_code(&["add y1, x1, x2"]));
    assert_eq!("EP02", error_code(&["add p1, x1, x2"]));
    assert_eq!("EP03", error_code(&["addi x1, x2, 12a"]));
    assert_eq!("EP03", error_code(&["addi x1, x2, 99999999999999999999"]));
    assert_eq!("EP04", error_code(&["ld x1, x2"]));
    assert_eq!("EP05", error_code(&["add x1, x2"]));
    assert_eq!("EP05", error_code(&["nop x1"]));
    assert_eq!("EP06", error_code(&["add x1, x2, $3"]));
    assert_eq!("EP07", error_code(&["mov p1, x2"]));
    assert_eq!("EP07", error_code(&["add x1, x2, (x3)"]));
}

#[test]
fn parse_stops_at_first_error() {
    let messages = parse(&["nop", "foo", "bar"]).unwrap_err();

    assert_eq!(vec!["EP00"], messages.codes());
    assert!(messages.msgs[0].message.starts_with("instruction 1:"));
}

#[test]
fn parse_points_into_joined_source() {
    let messages = parse(&["nop", "add x1, x2, $3"]).unwrap_err();
    let label = &messages.msgs[0].labels[0];

    // "nop\n" is four bytes and `$` is at byte 12 of its line.
    assert_eq!(Span::new(0, 16, 17), Span::new(0, label.range.start, label.range.end));
}

#[test]
fn registers() {
    assert_eq!(Some(x(0)), parse_register("x0"));
    assert_eq!(Some(x(95)), parse_register("x95"));
    assert_eq!(Some(Register::Predicate(7)), parse_register("p7"));
    assert_eq!(Some(Register::EpilogueCount), parse_register("EC"));
    assert_eq!(None, parse_register("x96"));
    assert_eq!(None, parse_register("x"));
    assert_eq!(None, parse_register("x1a"));
    assert_eq!(None, parse_register("lc"));
}

#[test]
fn immediates() {
    assert_eq!(Some(42), parse_immediate("42"));
    assert_eq!(Some(42), parse_immediate("+42"));
    assert_eq!(Some(-255), parse_immediate("-0xff"));
    assert_eq!(Some(8), parse_immediate("0o10"));
    assert_eq!(Some(i64::MIN), parse_immediate("-9223372036854775808"));
    assert_eq!(None, parse_immediate("9223372036854775808"));
    assert_eq!(None, parse_immediate("0x"));
    assert_eq!(None, parse_immediate("--1"));
}
