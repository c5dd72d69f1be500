use vliw_common::inst::Op;

use super::{lower_bound, schedule_pipelined};
use crate::config::SchedulerConfig;
use crate::error::{RegisterKind, ScheduleError};
use crate::testing::{add, addi, ld, mulu, program, rows, st};

fn row(slots: [&str; 5]) -> [String; 5] {
    slots.map(String::from)
}

fn pipelined(ops: Vec<Op>) -> Result<vliw_common::bundle::Schedule, ScheduleError> {
    let (insts, analysis) = program(ops);
    schedule_pipelined(&insts, &analysis, &SchedulerConfig::default())
}

#[test]
fn lower_bound_counts_units() {
    let (insts, _) = program(vec![
        addi(1, 0, 1),
        addi(2, 0, 1),
        add(3, 1, 2),
        mulu(4, 3, 3),
        mulu(5, 3, 3),
        ld(6, 0, 1),
        Op::Nop,
    ]);

    assert_eq!(2, lower_bound(&insts));
    assert_eq!(1, lower_bound(&insts[..1]));
    assert_eq!(1, lower_bound(std::iter::empty()));
}

#[test]
fn single_instruction_loop() {
    let schedule = pipelined(vec![addi(1, 0, 10), Op::LoopPip { target: 0 }]).unwrap();

    assert_eq!(
        vec![
            row(["mov EC, 0", "mov p32, true", "-", "-", "-"]),
            row(["(p32) addi x32, x1, 10", "-", "-", "-", "loop.pip 1"]),
        ],
        rows(&schedule)
    );
    assert_eq!(1..2, schedule.body);
}

#[test]
fn stages_rotate_registers() {
    let schedule = pipelined(vec![
        addi(1, 0, 0),
        ld(2, 0, 1),
        mulu(3, 2, 2),
        addi(1, 1, 8),
        st(3, 0, 1),
        Op::LoopPip { target: 1 },
    ])
    .unwrap();

    assert_eq!(
        vec![
            row(["addi x33, x1, 0", "mov EC, 2", "-", "-", "-"]),
            row(["mov p32, true", "-", "-", "-", "-"]),
            row(["(p32) addi x32, x33, 8", "-", "-", "(p32) ld x36, 0(x33)", "-"]),
            row(["-", "-", "(p32) mulu x40, x36, x36", "(p34) st x42, 0(x34)", "loop.pip 2"]),
        ],
        rows(&schedule)
    );
    assert_eq!(2..4, schedule.body);
}

#[test]
fn slow_carried_value_raises_interval() {
    let schedule = pipelined(vec![addi(1, 0, 1), mulu(1, 1, 1), Op::LoopPip { target: 1 }]).unwrap();

    assert_eq!(
        vec![
            row(["addi x33, x1, 1", "mov EC, 0", "-", "-", "-"]),
            row(["mov p32, true", "-", "-", "-", "-"]),
            row(["-", "-", "(p32) mulu x32, x33, x33", "-", "-"]),
            row(["-", "-", "-", "-", "-"]),
            row(["-", "-", "-", "-", "loop.pip 2"]),
        ],
        rows(&schedule)
    );
    assert_eq!(3, schedule.body.len());
}

#[test]
fn interval_bound_is_enforced() {
    let (insts, analysis) = program(vec![addi(1, 0, 1), mulu(1, 1, 1), Op::LoopPip { target: 1 }]);
    let config = SchedulerConfig::new(Some(2));

    assert_eq!(
        Err(ScheduleError::Infeasible { max_ii: 2 }),
        schedule_pipelined(&insts, &analysis, &config)
    );
}

#[test]
fn invariants_and_post_loop_reads() {
    let schedule = pipelined(vec![
        addi(5, 0, 3),
        addi(1, 0, 0),
        add(2, 1, 5),
        addi(1, 1, 1),
        Op::LoopPip { target: 2 },
        add(6, 2, 5),
    ])
    .unwrap();

    assert_eq!(
        vec![
            row(["addi x1, x3, 3", "addi x35, x3, 0", "-", "-", "-"]),
            row(["mov EC, 0", "mov p32, true", "-", "-", "-"]),
            row(["(p32) add x32, x35, x1", "(p32) addi x34, x35, 1", "-", "-", "loop.pip 2"]),
            row(["add x2, x32, x1", "-", "-", "-", "-"]),
        ],
        rows(&schedule)
    );
    assert_eq!(2..3, schedule.body);
}

#[test]
fn straight_code_uses_static_registers() {
    let schedule = pipelined(vec![add(3, 1, 2), mulu(4, 3, 1)]).unwrap();

    assert_eq!(
        vec![
            row(["add x1, x3, x4", "-", "-", "-", "-"]),
            row(["-", "-", "mulu x2, x1, x3", "-", "-"]),
        ],
        rows(&schedule)
    );
    assert!(!schedule.has_loop());
}

#[test]
fn interval_is_at_least_lower_bound() {
    let ops = vec![
        addi(1, 0, 0),
        ld(2, 0, 1),
        ld(3, 8, 1),
        add(4, 2, 3),
        st(4, 16, 1),
        addi(1, 1, 24),
        Op::LoopPip { target: 1 },
    ];
    let (insts, analysis) = program(ops.clone());
    let schedule = pipelined(ops).unwrap();

    assert!(schedule.body.len() >= lower_bound(&insts[analysis.sections.body_ops()]));
    assert!(schedule.body.len() >= 3);
}

#[test]
fn too_many_rotating_registers() {
    let mut ops: Vec<Op> = (0..33).map(|n| addi(1, 0, n)).collect();
    ops.push(Op::LoopPip { target: 0 });

    assert_eq!(
        Err(ScheduleError::RegistersExhausted {
            kind: RegisterKind::Rotating,
            limit: 95
        }),
        pipelined(ops)
    );
}

#[test]
fn pipelining_is_deterministic() {
    let ops = vec![
        addi(1, 0, 0),
        ld(2, 0, 1),
        mulu(3, 2, 2),
        addi(1, 1, 8),
        st(3, 0, 1),
        Op::LoopPip { target: 1 },
        add(4, 3, 1),
    ];

    assert_eq!(pipelined(ops.clone()), pipelined(ops));
}

#[test]
fn late_carried_value_starts_in_rotating_file() {
    let schedule = pipelined(vec![
        mulu(1, 2, 3),
        st(9, 0, 8),
        addi(1, 1, 1),
        Op::LoopPip { target: 1 },
    ])
    .unwrap();

    assert_eq!(
        vec![
            row(["mov EC, 2", "mov p32, true", "mulu x32, x1, x2", "-", "-"]),
            row(["(p34) addi x33, x34, 1", "-", "-", "(p32) st x3, 0(x4)", "loop.pip 1"]),
        ],
        rows(&schedule)
    );
    assert_eq!(1..2, schedule.body);
}
