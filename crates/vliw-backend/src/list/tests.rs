use vliw_common::inst::Op;

use super::schedule_loop;
use crate::error::{RegisterKind, ScheduleError};
use crate::testing::{add, addi, bundles_of, ld, mulu, program, rows, st};

fn row(slots: [&str; 5]) -> [String; 5] {
    slots.map(String::from)
}

#[test]
fn dependent_multiply_waits_one_bundle() {
    let (insts, analysis) = program(vec![add(3, 1, 2), mulu(4, 3, 1)]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(
        vec![
            row(["add x1, x3, x4", "-", "-", "-", "-"]),
            row(["-", "-", "mulu x2, x1, x3", "-", "-"]),
        ],
        rows(&schedule)
    );
    assert!(!schedule.has_loop());
    assert_eq!(2..2, schedule.body);
}

#[test]
fn independent_alu_ops_pair_up() {
    let ops = (1..=5).map(|n| addi(n, 0, n as i64)).collect();
    let (insts, analysis) = program(ops);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(3, schedule.len());
    assert_eq!(vec![Some(0), Some(0), Some(1), Some(1), Some(2)], bundles_of(&schedule, 5));

    let rows = rows(&schedule);
    assert_ne!("-", rows[0][0]);
    assert_ne!("-", rows[0][1]);
    assert_ne!("-", rows[2][0]);
    assert_eq!("-", rows[2][1]);
}

#[test]
fn nops_take_no_slot() {
    let (insts, analysis) = program(vec![Op::Nop, addi(1, 0, 1), Op::Nop]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(vec![row(["addi x1, x2, 1", "-", "-", "-", "-"])], rows(&schedule));
}

#[test]
fn latency_is_respected() {
    let (insts, analysis) = program(vec![
        mulu(1, 2, 3),
        add(4, 1, 1),
        ld(5, 0, 4),
        st(5, 8, 4),
    ]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(vec![Some(0), Some(3), Some(4), Some(5)], bundles_of(&schedule, 4));
}

#[test]
fn carried_value_is_copied_back_after_branch_delay() {
    let (insts, analysis) = program(vec![addi(1, 0, 0), addi(1, 1, 1), Op::Loop { target: 1 }]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(
        vec![
            row(["addi x1, x3, 0", "-", "-", "-", "-"]),
            row(["addi x2, x1, 1", "-", "-", "-", "-"]),
            row(["mov x1, x2", "-", "-", "-", "loop 1"]),
        ],
        rows(&schedule)
    );
    assert_eq!(1..3, schedule.body);
}

#[test]
fn carried_copy_shares_branch_bundle() {
    let (insts, analysis) = program(vec![
        addi(1, 0, 0),
        addi(1, 1, 1),
        mulu(3, 2, 2),
        add(4, 3, 3),
        Op::Loop { target: 1 },
    ]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(
        vec![
            row(["addi x1, x5, 0", "-", "-", "-", "-"]),
            row(["addi x2, x1, 1", "-", "mulu x3, x6, x6", "-", "-"]),
            row(["-", "-", "-", "-", "-"]),
            row(["-", "-", "-", "-", "-"]),
            row(["add x4, x3, x3", "mov x1, x2", "-", "-", "loop 1"]),
        ],
        rows(&schedule)
    );
    assert_eq!(1..5, schedule.body);
}

#[test]
fn slow_carried_value_stretches_body() {
    let (insts, analysis) = program(vec![addi(1, 0, 1), mulu(1, 1, 1), Op::Loop { target: 1 }]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(
        vec![
            row(["addi x1, x3, 1", "-", "-", "-", "-"]),
            row(["-", "-", "mulu x2, x1, x1", "-", "-"]),
            row(["-", "-", "-", "-", "-"]),
            row(["-", "-", "-", "-", "-"]),
            row(["mov x1, x2", "-", "-", "-", "loop 1"]),
        ],
        rows(&schedule)
    );
    assert_eq!(1..5, schedule.body);
}

#[test]
fn leading_delay_moves_before_loop() {
    let (insts, analysis) = program(vec![mulu(1, 2, 3), add(4, 1, 1), Op::Loop { target: 1 }]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(4, schedule.len());
    assert_eq!(3..4, schedule.body);
    assert_eq!(
        row(["add x2, x1, x1", "-", "-", "-", "loop 3"]),
        rows(&schedule)[3]
    );
}

#[test]
fn loop_pip_branch_becomes_loop() {
    let (insts, analysis) = program(vec![addi(1, 0, 10), Op::LoopPip { target: 0 }]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(
        vec![row(["addi x1, x2, 10", "-", "-", "-", "loop 0"])],
        rows(&schedule)
    );
    assert_eq!(0..1, schedule.body);
}

#[test]
fn branch_only_loop() {
    let (insts, analysis) = program(vec![addi(1, 0, 1), Op::Loop { target: 1 }, add(2, 1, 1)]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();

    assert_eq!(
        vec![
            row(["addi x1, x3, 1", "-", "-", "-", "-"]),
            row(["-", "-", "-", "-", "loop 1"]),
            row(["add x2, x1, x1", "-", "-", "-", "-"]),
        ],
        rows(&schedule)
    );
}

#[test]
fn post_loop_reads_body_values() {
    let (insts, analysis) = program(vec![
        addi(1, 0, 0),
        ld(2, 0, 1),
        addi(1, 1, 8),
        Op::Loop { target: 1 },
        st(2, 0, 1),
    ]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();
    let at = bundles_of(&schedule, insts.len());

    assert!(at[4].unwrap() >= schedule.body.end);
    assert_eq!("st x3, 0(x2)", rows(&schedule)[at[4].unwrap()][3]);
}

#[test]
fn producers_issue_before_readers() {
    let (insts, analysis) = program(vec![
        addi(1, 0, 0),
        addi(5, 0, 3),
        ld(2, 0, 1),
        mulu(3, 2, 5),
        add(4, 3, 2),
        st(4, 0, 1),
        addi(1, 1, 8),
        Op::Loop { target: 2 },
        add(6, 4, 1),
        st(6, 0, 5),
    ]);
    let schedule = schedule_loop(&insts, &analysis).unwrap();
    let at = bundles_of(&schedule, insts.len());

    for (pc, deps) in analysis.deps.iter().enumerate() {
        for (_, producer) in deps.producers() {
            let ready = at[producer].unwrap() + insts[producer].latency();
            assert!(ready <= at[pc].unwrap(), "{pc} reads {producer} too early");
        }
    }
}

#[test]
fn scheduling_is_deterministic() {
    let (insts, analysis) = program(vec![
        addi(1, 0, 0),
        ld(2, 0, 1),
        mulu(3, 2, 2),
        st(3, 0, 1),
        addi(1, 1, 8),
        Op::Loop { target: 1 },
    ]);

    assert_eq!(
        schedule_loop(&insts, &analysis),
        schedule_loop(&insts, &analysis)
    );
}

#[test]
fn too_many_registers() {
    let ops = (0..96).map(|n| addi(1, 0, n)).collect();
    let (insts, analysis) = program(ops);

    assert_eq!(
        Err(ScheduleError::RegistersExhausted {
            kind: RegisterKind::Static,
            limit: 95
        }),
        schedule_loop(&insts, &analysis)
    );
}
