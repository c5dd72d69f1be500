//! Register allocation for the pipelined schedule.
//!
//! Values written in the loop body live in rotating registers, which shift by
//! one every iteration, so a read names the base register of its producer
//! plus the number of stages between the write and the read. Everything else
//! uses static registers.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use log::{debug, info, trace};
use vliw_common::inst::{Pc, Register};
use vliw_midend::{Analysis, Dep};

use super::Kernel;
use crate::alloc::{rotated, Fresh, InputBinder};
use crate::error::ScheduleError;
use crate::timeline::Timeline;

pub fn allocate(
    timeline: &mut Timeline,
    analysis: &Analysis,
    kernel: Option<Kernel>,
) -> Result<(), ScheduleError> {
    info!("beginning rotating register allocation");

    let mut allocator = RotatingAllocator::new(timeline, analysis, kernel);

    let rotating = allocator.rotating_writes(Fresh::rotating())?;
    let statics = allocator.invariant_writes(Fresh::statics())?;
    allocator.body_reads();
    allocator.carried_inits();
    let statics = allocator.outer_locals(statics)?;
    allocator.post_loop_reads();
    allocator.outer_invariants();
    let statics = allocator.inputs(statics)?;

    debug!(
        "used static registers up to x{} and rotating registers up to x{}",
        statics.peek() - 1,
        rotating.peek() - 1
    );
    trace!("done rotating register allocation");

    Ok(())
}

struct RotatingAllocator<'t, 'a> {
    timeline: &'t mut Timeline<'a>,
    analysis: &'t Analysis,
    kernel: Option<Kernel>,
    /// The rotating base register of every body write, by pc.
    bases: Vec<Option<Register>>,
    written: Vec<bool>,
    /// Indexed by pc, then by operand.
    bound: Vec<Vec<bool>>,
}

impl<'t, 'a> RotatingAllocator<'t, 'a> {
    fn new(timeline: &'t mut Timeline<'a>, analysis: &'t Analysis, kernel: Option<Kernel>) -> Self {
        let len = timeline.insts.len();
        let bound = timeline
            .insts
            .iter()
            .map(|inst| vec![false; inst.op.reads().len()])
            .collect();

        Self {
            timeline,
            analysis,
            kernel,
            bases: vec![None; len],
            written: vec![false; len],
            bound,
        }
    }

    fn body(&self) -> Range<usize> {
        match self.kernel {
            Some(kernel) => kernel.start..kernel.end(),
            None => {
                let end = self.timeline.len();
                end..end
            }
        }
    }

    /// The pcs issued in the given bundles, in bundle and slot order.
    fn pcs(&self, bundles: Range<usize>) -> Vec<Pc> {
        self.timeline.bundles[bundles]
            .iter()
            .flat_map(|bundle| bundle.iter().filter_map(|(_, item)| item.inst.pc))
            .collect()
    }

    fn pre_loop(&self) -> Vec<Pc> {
        self.pcs(0..self.body().start)
    }

    fn loop_body(&self) -> Vec<Pc> {
        self.pcs(self.body())
    }

    fn post_loop(&self) -> Vec<Pc> {
        self.pcs(self.body().end..self.timeline.len())
    }

    fn outside(&self) -> Vec<Pc> {
        let mut pcs = self.pre_loop();
        pcs.extend(self.post_loop());
        pcs
    }

    fn stage(&self, pc: Pc) -> usize {
        match self.kernel {
            Some(kernel) => kernel.stage(self.timeline.at(pc)),
            None => unreachable!("stage of instruction {pc} in a program without a loop"),
        }
    }

    fn base(&self, pc: Pc) -> Register {
        match self.bases[pc] {
            Some(base) => base,
            None => unreachable!("instruction {pc} has no rotating register"),
        }
    }

    fn dst(&self, pc: Pc) -> Register {
        match self.timeline.dst(pc) {
            Some(dst) => dst,
            None => unreachable!("instruction {pc} writes nothing"),
        }
    }

    fn writes_general(&self, pc: Pc) -> bool {
        self.timeline.insts[pc]
            .op
            .dst()
            .map_or(false, |dst| dst.is_general())
    }

    fn set_dst(&mut self, pc: Pc, reg: Register) {
        if let Some(dst) = self
            .timeline
            .item_mut(pc)
            .and_then(|item| item.inst.op.dst_mut())
        {
            *dst = reg;
        }

        self.written[pc] = true;
    }

    fn set_read(&mut self, pc: Pc, i: usize, reg: Register) {
        if let Some(item) = self.timeline.item_mut(pc) {
            if let Some(operand) = item.inst.op.reads_mut().into_iter().nth(i) {
                *operand = reg;
            }
        }

        self.bound[pc][i] = true;
    }

    /// The original registers read by an instruction with their dependency.
    fn reads(&self, pc: Pc) -> Vec<(usize, Register, Option<Dep>)> {
        let deps = &self.analysis.deps[pc];
        self.timeline.insts[pc]
            .op
            .reads()
            .into_iter()
            .enumerate()
            .map(|(i, reg)| (i, reg, deps.get(reg)))
            .collect()
    }

    /// Every body write gets a base register with room for one copy per
    /// stage and one more for the value carried into the next iteration.
    ///
    /// The initial value of a carried write in stage `s` is written before
    /// the loop to `base + 1 - s`, so such a base is preceded by `s - 1`
    /// numbers of its own.
    fn rotating_writes(&mut self, mut fresh: Fresh) -> Result<Fresh, ScheduleError> {
        let Some(kernel) = self.kernel else {
            return Ok(fresh);
        };

        let per_base = kernel.stages() as u32 + 1;
        let carried: BTreeSet<Pc> = self
            .analysis
            .deps
            .iter()
            .flat_map(|deps| deps.interloop.values())
            .map(|carried| carried.body)
            .collect();

        for pc in self.loop_body() {
            if self.writes_general(pc) {
                let stage = self.stage(pc);
                if carried.contains(&pc) && stage > 1 {
                    fresh.take(stage as u32 - 1)?;
                }

                let base = fresh.take(per_base)?;
                self.bases[pc] = Some(base);
                self.set_dst(pc, base);
            }
        }

        Ok(fresh)
    }

    /// Pre-loop values the body only reads go into static registers.
    fn invariant_writes(&mut self, mut fresh: Fresh) -> Result<Fresh, ScheduleError> {
        for pc in self.loop_body() {
            let producers: Vec<Pc> = self.analysis.deps[pc].invariant.values().copied().collect();

            for producer in producers {
                if !self.written[producer] {
                    let reg = fresh.next()?;
                    self.set_dst(producer, reg);
                }
            }
        }

        Ok(fresh)
    }

    fn body_reads(&mut self) {
        for pc in self.loop_body() {
            let stage = self.stage(pc);

            for (i, _, dep) in self.reads(pc) {
                let reg = match dep {
                    Some(Dep::Invariant(producer)) => self.dst(producer),
                    Some(Dep::Local(producer)) => {
                        rotated(self.base(producer), self.stage(producer), stage, 0)
                    }
                    Some(Dep::Interloop(carried)) => {
                        rotated(self.base(carried.body), self.stage(carried.body), stage, 1)
                    }
                    Some(Dep::PostLoop(_)) | None => continue,
                };

                self.set_read(pc, i, reg);
            }
        }
    }

    /// A pre-loop write of a carried value fills the register the first
    /// iteration reads it from.
    fn carried_inits(&mut self) {
        let inits: BTreeMap<Pc, Pc> = self
            .analysis
            .deps
            .iter()
            .flat_map(|deps| deps.interloop.values())
            .map(|carried| (carried.init, carried.body))
            .collect();

        for pc in self.pre_loop() {
            if let Some(&body) = inits.get(&pc) {
                let reg = rotated(self.base(body), self.stage(body), 0, 1);
                self.set_dst(pc, reg);
            }
        }
    }

    /// Bind local reads before and after the loop and give the remaining
    /// writes there static registers.
    fn outer_locals(&mut self, mut fresh: Fresh) -> Result<Fresh, ScheduleError> {
        for pc in self.outside() {
            for (i, _, dep) in self.reads(pc) {
                if let Some(Dep::Local(producer)) = dep {
                    let reg = self.dst(producer);
                    self.set_read(pc, i, reg);
                }
            }

            if self.writes_general(pc) && !self.written[pc] {
                let reg = fresh.next()?;
                self.set_dst(pc, reg);
            }
        }

        Ok(fresh)
    }

    /// After the loop, a body value is read from where the last stage of the
    /// final iteration sees it.
    fn post_loop_reads(&mut self) {
        let Some(kernel) = self.kernel else {
            return;
        };

        let last = kernel.stages() - 1;

        for pc in self.post_loop() {
            for (i, _, dep) in self.reads(pc) {
                if let Some(Dep::PostLoop(producer)) = dep {
                    let reg = rotated(self.base(producer), self.stage(producer), last, 0);
                    self.set_read(pc, i, reg);
                }
            }
        }
    }

    fn outer_invariants(&mut self) {
        for pc in self.outside() {
            for (i, _, dep) in self.reads(pc) {
                if let Some(Dep::Invariant(producer)) = dep {
                    let reg = self.dst(producer);
                    self.set_read(pc, i, reg);
                }
            }
        }
    }

    /// The remaining reads have no producer and get one static register per
    /// input register.
    fn inputs(&mut self, mut fresh: Fresh) -> Result<Fresh, ScheduleError> {
        let mut inputs = InputBinder::new();

        for pc in self.pcs(0..self.timeline.len()) {
            for (i, original, _) in self.reads(pc) {
                if !self.bound[pc][i] {
                    let reg = inputs.bind(&mut fresh, original)?;
                    self.set_read(pc, i, reg);
                }
            }
        }

        Ok(fresh)
    }
}
