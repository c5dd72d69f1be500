//! Register allocation for the list schedule.
//!
//! Every write gets its own register. Reads are bound to the register of
//! their producer, and carried values are copied from the body register back
//! into the pre-loop register at the end of every iteration.

use std::collections::{BTreeSet, HashSet};

use log::{debug, info, trace};
use vliw_common::bundle::{Schedule, Slot, Slotted};
use vliw_common::inst::{Instruction, MovSource, Op, Pc, Register};
use vliw_midend::{Analysis, Dep};

use super::Body;
use crate::alloc::{Fresh, InputBinder};
use crate::error::ScheduleError;
use crate::timeline::{Loc, Timeline};

pub fn allocate(
    timeline: Timeline,
    analysis: &Analysis,
    body: Option<Body>,
) -> Result<Schedule, ScheduleError> {
    info!("beginning list register allocation");

    let mut allocator = ListAllocator::new(timeline, analysis, body);

    let fresh = allocator.number_writes(Fresh::general())?;
    allocator.bind_reads();
    allocator.insert_fixups();
    let fresh = allocator.number_inputs(fresh)?;

    debug!("used registers up to x{}", fresh.peek() - 1);
    trace!("done list register allocation");

    Ok(allocator.finish())
}

struct ListAllocator<'a> {
    timeline: Timeline<'a>,
    analysis: &'a Analysis,
    body: Option<Body>,
    /// Indexed by pc, then by operand.
    resolved: Vec<Vec<bool>>,
}

impl<'a> ListAllocator<'a> {
    fn new(timeline: Timeline<'a>, analysis: &'a Analysis, body: Option<Body>) -> Self {
        let resolved = timeline
            .insts
            .iter()
            .map(|inst| vec![false; inst.op.reads().len()])
            .collect();

        Self {
            timeline,
            analysis,
            body,
            resolved,
        }
    }

    /// Give every general-purpose destination a fresh number in bundle and
    /// slot order.
    fn number_writes(&mut self, mut fresh: Fresh) -> Result<Fresh, ScheduleError> {
        for bundle in self.timeline.bundles.iter_mut() {
            for (_, item) in bundle.iter_mut() {
                if let Some(dst) = item.inst.op.dst_mut().filter(|dst| dst.is_general()) {
                    *dst = fresh.next()?;
                }
            }
        }

        Ok(fresh)
    }

    /// Rewrite every read with a producer to the producer's register. Carried
    /// reads use the pre-loop producer.
    fn bind_reads(&mut self) {
        let insts = self.timeline.insts;

        for (pc, inst) in insts.iter().enumerate() {
            if self.timeline.placed[pc].is_none() {
                continue;
            }

            for (i, reg) in inst.op.reads().into_iter().enumerate() {
                let producer = match self.analysis.deps[pc].get(reg) {
                    Some(Dep::Local(p) | Dep::Invariant(p) | Dep::PostLoop(p)) => p,
                    Some(Dep::Interloop(carried)) => carried.init,
                    None => continue,
                };

                let Some(renamed) = self.timeline.dst(producer) else {
                    unreachable!("producer {producer} of instruction {pc} writes nothing");
                };

                self.set_read(pc, i, renamed);
                self.resolved[pc][i] = true;
            }
        }
    }

    fn set_read(&mut self, pc: Pc, i: usize, reg: Register) {
        if let Some(item) = self.timeline.item_mut(pc) {
            if let Some(operand) = item.inst.op.reads_mut().into_iter().nth(i) {
                *operand = reg;
            }
        }
    }

    /// Copy every carried value from its body register into its pre-loop
    /// register once it is ready, delaying the branch if needed.
    fn insert_fixups(&mut self) {
        let Some(mut body) = self.body else {
            return;
        };

        let analysis = self.analysis;
        let mut handled = HashSet::new();

        for pc in analysis.sections.body_ops() {
            for carried in analysis.deps[pc].interloop.values() {
                let (Some(init), Some(latest)) = (
                    self.timeline.dst(carried.init),
                    self.timeline.dst(carried.body),
                ) else {
                    unreachable!("carried value of instruction {pc} is never written");
                };

                if !handled.insert(init) {
                    continue;
                }

                let fixup = Slotted::new(Instruction::synthesized(Op::Mov {
                    dst: init,
                    src: MovSource::Register(latest),
                }));

                let mut ready = self.timeline.at(carried.body) + self.timeline.insts[carried.body].latency();

                if ready <= body.branch {
                    if self.timeline.bundles[body.branch].insert(fixup).is_some() {
                        continue;
                    }

                    ready = body.branch + 1;
                }

                debug!(
                    "delaying the loop branch from bundle {} to {ready} for `{init}`",
                    body.branch
                );

                self.timeline
                    .insert_bundles(body.branch + 1, ready - body.branch);
                self.timeline.relocate(body.pc, ready);
                self.timeline.bundles[ready].put(Slot::Alu1, fixup);
                body.branch = ready;
            }
        }

        self.body = Some(body);
    }

    /// Number the remaining reads, which are true inputs of the program. A
    /// write is only visible to the bundles after it.
    fn number_inputs(&mut self, mut fresh: Fresh) -> Result<Fresh, ScheduleError> {
        let mut inputs = InputBinder::new();
        let mut visible = BTreeSet::new();

        for at in 0..self.timeline.len() {
            let writes: Vec<Register> = self.timeline.bundles[at]
                .iter()
                .filter_map(|(_, item)| item.inst.op.dst())
                .collect();

            let pcs: Vec<Pc> = self.timeline.bundles[at]
                .iter()
                .filter_map(|(_, item)| item.inst.pc)
                .collect();

            for pc in pcs {
                let original = self.timeline.insts[pc].op.reads();
                let current = match self.timeline.item(pc) {
                    Some(item) => item.inst.op.reads(),
                    None => continue,
                };

                for (i, (original, current)) in original.into_iter().zip(current).enumerate() {
                    if self.resolved[pc][i] && visible.contains(&current) {
                        continue;
                    }

                    let reg = inputs.bind(&mut fresh, original)?;
                    self.set_read(pc, i, reg);
                    self.resolved[pc][i] = true;
                }
            }

            visible.extend(writes);
        }

        Ok(fresh)
    }

    fn finish(self) -> Schedule {
        let bundles = self.timeline.bundles;

        match self.body {
            Some(body) => Schedule {
                bundles,
                body: body.start..body.branch + 1,
            },

            None => Schedule::straight(bundles),
        }
    }
}
