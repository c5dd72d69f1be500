//! Constructors for hand written test programs.

use vliw_common::bundle::{Schedule, Slot};
use vliw_common::inst::{Instruction, MovSource, Op, Register};
use vliw_midend::{analyze, Analysis};

pub fn x(n: u32) -> Register {
    Register::General(n)
}

pub fn program(ops: Vec<Op>) -> (Vec<Instruction>, Analysis) {
    let insts: Vec<_> = ops
        .into_iter()
        .enumerate()
        .map(|(pc, op)| Instruction::new(pc, op))
        .collect();
    let analysis = analyze(&insts);

    (insts, analysis)
}

pub fn add(dst: u32, lhs: u32, rhs: u32) -> Op {
    Op::Add {
        dst: x(dst),
        lhs: x(lhs),
        rhs: x(rhs),
    }
}

pub fn addi(dst: u32, src: u32, imm: i64) -> Op {
    Op::Addi {
        dst: x(dst),
        src: x(src),
        imm,
    }
}

pub fn mulu(dst: u32, lhs: u32, rhs: u32) -> Op {
    Op::Mulu {
        dst: x(dst),
        lhs: x(lhs),
        rhs: x(rhs),
    }
}

pub fn ld(dst: u32, offset: i64, base: u32) -> Op {
    Op::Ld {
        dst: x(dst),
        offset,
        base: x(base),
    }
}

pub fn st(src: u32, offset: i64, base: u32) -> Op {
    Op::St {
        src: x(src),
        offset,
        base: x(base),
    }
}

pub fn mov_imm(dst: Register, imm: i64) -> Op {
    Op::Mov {
        dst,
        src: MovSource::Immediate(imm),
    }
}

/// Every bundle rendered as its five slots, with `-` for empty ones.
pub fn rows(schedule: &Schedule) -> Vec<[String; Slot::COUNT]> {
    schedule
        .bundles
        .iter()
        .map(|bundle| {
            Slot::ALL.map(|slot| match bundle.get(slot) {
                Some(item) => item.to_string(),
                None => String::from("-"),
            })
        })
        .collect()
}

/// The bundle each original instruction was issued in.
pub fn bundles_of(schedule: &Schedule, len: usize) -> Vec<Option<usize>> {
    let mut at = vec![None; len];
    for (bundle, _, item) in schedule.items() {
        if let Some(pc) = item.inst.pc {
            at[pc] = Some(bundle);
        }
    }

    at
}
