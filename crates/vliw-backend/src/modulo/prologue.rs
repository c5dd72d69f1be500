//! Loop setup and folding of the unrolled stages into one kernel of `ii`
//! bundles.

use log::debug;
use vliw_common::bundle::{Bundle, Schedule, Slot, Slotted};
use vliw_common::inst::{Instruction, MovSource, Op, Register};

use super::Kernel;
use crate::timeline::Timeline;

/// The first stage predicate. Stage `n` of the kernel runs under `p(32 + n)`.
pub const FIRST_STAGE_PREDICATE: u32 = 32;

pub fn finish(timeline: Timeline, kernel: Option<Kernel>) -> Schedule {
    let mut bundles = timeline.bundles;

    let Some(kernel) = kernel else {
        return Schedule::straight(bundles);
    };

    let start = setup(&mut bundles, kernel);

    for bundle in bundles.iter_mut() {
        for (_, item) in bundle.iter_mut() {
            if let Some(target) = item.inst.op.target_mut() {
                *target = start as i64;
            }
        }
    }

    let post = bundles.split_off(start + kernel.len);
    let unfolded = bundles.split_off(start);
    bundles.extend(fold(unfolded, kernel.ii));
    bundles.extend(post);

    Schedule {
        bundles,
        body: start..start + kernel.ii,
    }
}

/// Initialise the epilogue counter and enable the first stage in the last
/// pre-loop bundle. Returns the new start of the loop body.
fn setup(bundles: &mut Vec<Bundle>, kernel: Kernel) -> usize {
    let mut start = kernel.start;

    if start == 0 {
        bundles.insert(0, Bundle::new());
        start += 1;
    }

    let stages = kernel.stages() as i64;
    let movs = [
        Op::Mov {
            dst: Register::EpilogueCount,
            src: MovSource::Immediate(stages - 1),
        },
        Op::Mov {
            dst: Register::Predicate(FIRST_STAGE_PREDICATE),
            src: MovSource::Predicate(true),
        },
    ];

    for op in movs {
        let item = Slotted::new(Instruction::synthesized(op));

        while bundles[start - 1].insert(item).is_none() {
            bundles.insert(start, Bundle::new());
            start += 1;
        }
    }

    debug!("loop body starts at bundle {start} after setup");

    start
}

/// Overlay the stages of the unrolled body. The item at offset `k` moves to
/// offset `k % ii` and runs under the predicate of stage `k / ii`.
fn fold(unfolded: Vec<Bundle>, ii: usize) -> Vec<Bundle> {
    let mut folded = vec![Bundle::new(); ii];

    for (k, mut bundle) in unfolded.into_iter().enumerate() {
        for slot in Slot::ALL {
            let Some(item) = bundle.take(slot) else {
                continue;
            };

            let item = if item.inst.is_branch() {
                item
            } else {
                let stage = (k / ii) as u32;
                Slotted::guarded(Register::Predicate(FIRST_STAGE_PREDICATE + stage), item.inst)
            };

            folded[k % ii].put(slot, item);
        }
    }

    folded
}
