//! The `loop` schedule: every section is list scheduled in program order and
//! the loop body runs one iteration per pass.

mod alloc;

#[cfg(test)]
mod tests;

use std::ops::Range;

use log::{debug, info, trace};
use vliw_common::bundle::{Schedule, Slot, Slotted};
use vliw_common::inst::{Instruction, Op, Pc};
use vliw_midend::Analysis;

use crate::error::ScheduleError;
use crate::timeline::{Loc, Timeline};

pub fn schedule_loop(insts: &[Instruction], analysis: &Analysis) -> Result<Schedule, ScheduleError> {
    info!("beginning list scheduling");

    let mut scheduler = ListScheduler::new(insts, analysis);
    let sections = &analysis.sections;

    scheduler.place_section(sections.pre.clone(), 0);

    let body = sections.branch().map(|branch| scheduler.place_body(branch));

    let post_start = scheduler.timeline.len();
    scheduler.place_section(sections.post.clone(), post_start);

    let schedule = alloc::allocate(scheduler.timeline, analysis, body)?;

    trace!("done list scheduling");

    Ok(schedule)
}

/// The placed loop body. `start` is the first body bundle after bubbles have
/// been handed to the pre-loop code, and `branch` the bundle of the branch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Body {
    pub start: usize,
    pub branch: usize,
    pub pc: Pc,
}

struct ListScheduler<'a> {
    analysis: &'a Analysis,
    timeline: Timeline<'a>,
}

impl<'a> ListScheduler<'a> {
    fn new(insts: &'a [Instruction], analysis: &'a Analysis) -> Self {
        Self {
            analysis,
            timeline: Timeline::new(insts),
        }
    }

    fn place_section(&mut self, pcs: Range<Pc>, start: usize) {
        for pc in pcs {
            self.timeline.place_ready(pc, start, &self.analysis.deps[pc]);
        }
    }

    fn place_body(&mut self, branch: Pc) -> Body {
        let start = self.timeline.len();
        self.place_section(self.analysis.sections.body_ops(), start);

        let needed = self.needed_ii();
        let natural = self.timeline.len() - start;
        let end = start + natural.max(needed);
        self.timeline.extend_to(end);

        // Leading empty bundles are just delays, so the pre-loop code can
        // wait for them instead.
        let mut loop_start = start;
        while loop_start + needed < end && self.timeline.bundles[loop_start].is_empty() {
            loop_start += 1;
        }

        debug!(
            "loop body spans bundles {loop_start}..{end}, needing {needed} (hoisted {})",
            loop_start - start
        );

        let inst = Instruction::new(
            branch,
            Op::Loop {
                target: loop_start as i64,
            },
        );
        let loc = Loc {
            bundle: end - 1,
            slot: Slot::Branch,
        };
        self.timeline.put(branch, loc, Slotted::new(inst));

        Body {
            start: loop_start,
            branch: end - 1,
            pc: branch,
        }
    }

    /// The shortest body length in which every carried value produced by one
    /// iteration is ready for its reader in the next.
    fn needed_ii(&self) -> usize {
        let mut needed = 1;

        for pc in self.analysis.sections.body_ops() {
            let Some(reader) = self.timeline.bundle_of(pc) else {
                continue;
            };

            for carried in self.analysis.deps[pc].interloop.values() {
                let ready = self.timeline.at(carried.body) + self.timeline.insts[carried.body].latency();
                needed = needed.max(ready.saturating_sub(reader));
            }
        }

        needed
    }
}
