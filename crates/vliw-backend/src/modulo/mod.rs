//! The `loop.pip` schedule: the loop body is modulo scheduled so that a new
//! iteration starts every `ii` bundles, and the overlapping iterations are
//! kept apart by rotating registers and stage predicates.

mod alloc;
mod prologue;
mod reservation;

#[cfg(test)]
mod tests;

use log::{debug, info, trace};
use vliw_common::bundle::{Schedule, Slot, Slotted};
use vliw_common::inst::{Instruction, Op, Pc, Unit};
use vliw_midend::Analysis;

use self::reservation::Reservation;
use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::timeline::{Loc, Timeline};

pub fn schedule_pipelined(
    insts: &[Instruction],
    analysis: &Analysis,
    config: &SchedulerConfig,
) -> Result<Schedule, ScheduleError> {
    info!("beginning modulo scheduling");

    let sections = &analysis.sections;
    let mut timeline = Timeline::new(insts);

    for pc in sections.pre.clone() {
        timeline.place_ready(pc, 0, &analysis.deps[pc]);
    }

    let kernel = match sections.branch() {
        Some(branch) => {
            let (pipelined, kernel) = search(timeline, analysis, config, branch)?;
            timeline = pipelined;
            Some(kernel)
        }

        None => None,
    };

    let post_start = timeline.len();
    for pc in sections.post.clone() {
        timeline.place_ready(pc, post_start, &analysis.deps[pc]);
    }

    alloc::allocate(&mut timeline, analysis, kernel)?;
    let schedule = prologue::finish(timeline, kernel);

    trace!("done modulo scheduling");

    Ok(schedule)
}

/// The placed loop body before folding. It spans `len` bundles from `start`,
/// which is a whole number of stages of `ii` bundles each.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Kernel {
    pub start: usize,
    pub len: usize,
    pub ii: usize,
}

impl Kernel {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn stages(&self) -> usize {
        self.len / self.ii
    }

    /// The stage an instruction issued in the given bundle belongs to.
    pub fn stage(&self, bundle: usize) -> usize {
        (bundle - self.start) / self.ii
    }

    /// The offset of the given bundle within its stage.
    pub fn offset(&self, bundle: usize) -> usize {
        (bundle - self.start) % self.ii
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Failure {
    /// Some instruction found no free slot in the window.
    NoFit,
    /// A carried value is not ready in time for the next iteration.
    Timing,
}

/// The smallest interval the functional units allow for the given body.
pub fn lower_bound<'a>(body: impl IntoIterator<Item = &'a Instruction>) -> usize {
    let (mut alu, mut mult, mut mem) = (0, 0, 0);

    for inst in body {
        match inst.unit() {
            Some(Unit::Alu) => alu += 1,
            Some(Unit::Mult) => mult += 1,
            Some(Unit::Mem) => mem += 1,
            Some(Unit::Branch) | None => {}
        }
    }

    1.max((alu + 1) / 2).max(mult).max(mem)
}

/// Try increasing intervals from the lower bound until the body fits.
fn search<'a>(
    timeline: Timeline<'a>,
    analysis: &Analysis,
    config: &SchedulerConfig,
    branch: Pc,
) -> Result<(Timeline<'a>, Kernel), ScheduleError> {
    let insts = timeline.insts;
    let body = &insts[analysis.sections.body_ops()];
    let lower = lower_bound(body);
    let max_ii = config.max_ii_for(lower, body);

    debug!("trying intervals {lower} to {max_ii}");

    for ii in lower..=max_ii {
        let mut probe = Probe::new(timeline.clone(), analysis, ii);

        match probe.run(branch) {
            Ok(kernel) => {
                debug!("loop body fits with ii = {ii} in {} stages", kernel.stages());
                return Ok((probe.timeline, kernel));
            }

            Err(failure) => debug!("ii = {ii} failed: {failure:?}"),
        }
    }

    Err(ScheduleError::Infeasible { max_ii })
}

/// One attempt at placing the loop body with a fixed interval.
struct Probe<'a, 'b> {
    timeline: Timeline<'a>,
    analysis: &'b Analysis,
    ii: usize,
    table: Reservation,
}

impl<'a, 'b> Probe<'a, 'b> {
    fn new(timeline: Timeline<'a>, analysis: &'b Analysis, ii: usize) -> Self {
        Self {
            timeline,
            analysis,
            ii,
            table: Reservation::new(ii),
        }
    }

    fn run(&mut self, branch: Pc) -> Result<Kernel, Failure> {
        let mut start = self.timeline.len();
        let window = start + 5 * self.ii + 3;
        self.timeline.extend_to(window);

        let mut last = None;
        for pc in self.analysis.sections.body_ops() {
            if let Some(at) = self.place(pc, start, window)? {
                last = last.max(Some(at));
            }
        }

        // Leading empty bundles become part of the pre-loop code.
        if last.is_some() {
            while self.timeline.bundles[start].is_empty() {
                start += 1;
            }
        }

        let branch_at = start + self.ii - 1;
        let inst = Instruction::new(
            branch,
            Op::LoopPip {
                target: start as i64,
            },
        );
        self.timeline.put(
            branch,
            Loc {
                bundle: branch_at,
                slot: Slot::Branch,
            },
            Slotted::new(inst),
        );

        let used = last.map_or(branch_at, |last| last.max(branch_at)) + 1 - start;
        let len = (used + self.ii - 1) / self.ii * self.ii;

        self.timeline.bundles.truncate(start + len);
        self.timeline.extend_to(start + len);

        let kernel = Kernel {
            start,
            len,
            ii: self.ii,
        };

        self.check_timing(&kernel)?;
        Ok(kernel)
    }

    /// Place a body instruction at the first offset whose residue still has
    /// a free slot of its unit.
    fn place(&mut self, pc: Pc, start: usize, window: usize) -> Result<Option<usize>, Failure> {
        let inst = self.timeline.insts[pc];
        let Some(unit) = inst.unit() else {
            return Ok(None);
        };

        let producers = self.analysis.deps[pc].producers().map(|(_, pc)| pc);
        let earliest = self.timeline.earliest(start, producers);

        let loc = (earliest..window).find_map(|bundle| {
            self.table
                .free(bundle - start, unit)
                .map(|slot| Loc { bundle, slot })
        });

        let Some(loc) = loc else {
            return Err(Failure::NoFit);
        };

        self.table.reserve(loc.bundle - start, loc.slot);
        self.timeline.put(pc, loc, Slotted::new(inst));

        Ok(Some(loc.bundle))
    }

    /// Every carried value must be ready before the next iteration reads it,
    /// both within the folded body and in absolute time.
    fn check_timing(&self, kernel: &Kernel) -> Result<(), Failure> {
        for pc in self.analysis.sections.body_ops() {
            let Some(reader) = self.timeline.bundle_of(pc) else {
                continue;
            };

            for carried in self.analysis.deps[pc].interloop.values() {
                let writer = self.timeline.at(carried.body);
                let latency = self.timeline.insts[carried.body].latency();

                let folded = kernel.offset(writer) + latency <= kernel.ii + kernel.offset(reader);
                let absolute = writer + latency <= kernel.ii + reader;

                if !folded || !absolute {
                    return Err(Failure::Timing);
                }
            }
        }

        Ok(())
    }
}
