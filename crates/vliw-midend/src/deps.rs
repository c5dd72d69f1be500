//! Classification of every register read by where its value comes from.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, trace};
use vliw_common::inst::{Instruction, Pc, Register};

use crate::sections::Sections;

/// The two producers of a value carried around the loop: the pre-loop write
/// that feeds the first iteration and the body write that feeds every later
/// one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Carried {
    pub init: Pc,
    pub body: Pc,
}

/// Where a single read gets its value from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dep {
    /// An earlier write in the same section.
    Local(Pc),
    /// A loop body read of a value written both before the loop and in it.
    Interloop(Carried),
    /// A write from an earlier section that is never rewritten in between.
    Invariant(Pc),
    /// A post-loop read of a value produced by the loop body.
    PostLoop(Pc),
}

/// The producers of the registers read by one instruction. The four maps are
/// disjoint, and a read that appears in none of them is a true input of the
/// program.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dependencies {
    pub local: BTreeMap<Register, Pc>,
    pub interloop: BTreeMap<Register, Carried>,
    pub invariant: BTreeMap<Register, Pc>,
    pub post_loop: BTreeMap<Register, Pc>,
}

impl Dependencies {
    pub fn get(&self, reg: Register) -> Option<Dep> {
        if let Some(&pc) = self.local.get(&reg) {
            Some(Dep::Local(pc))
        } else if let Some(&carried) = self.interloop.get(&reg) {
            Some(Dep::Interloop(carried))
        } else if let Some(&pc) = self.invariant.get(&reg) {
            Some(Dep::Invariant(pc))
        } else {
            self.post_loop.get(&reg).map(|&pc| Dep::PostLoop(pc))
        }
    }

    /// Every producer this instruction has to wait for. Carried values wait
    /// for their pre-loop producer.
    pub fn producers(&self) -> impl Iterator<Item = (Register, Pc)> + '_ {
        self.local
            .iter()
            .chain(self.invariant.iter())
            .chain(self.post_loop.iter())
            .map(|(&reg, &pc)| (reg, pc))
            .chain(self.interloop.iter().map(|(&reg, carried)| (reg, carried.init)))
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
            && self.interloop.is_empty()
            && self.invariant.is_empty()
            && self.post_loop.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Analysis {
    pub sections: Sections,
    /// Indexed by pc.
    pub deps: Vec<Dependencies>,
}

pub fn analyze(insts: &[Instruction]) -> Analysis {
    info!("beginning dependency analysis");

    let sections = Sections::split(insts);
    let mut analyzer = Analyzer::new(insts);

    let pre_writers = analyzer.scan_pre(&sections);
    let body_writers = analyzer.scan_body(&sections, &pre_writers);
    analyzer.scan_post(&sections, &pre_writers, &body_writers);

    trace!("done dependency analysis");

    Analysis {
        sections,
        deps: analyzer.deps,
    }
}

type Writers = BTreeMap<Register, Pc>;

struct Analyzer<'a> {
    insts: &'a [Instruction],
    deps: Vec<Dependencies>,
}

impl<'a> Analyzer<'a> {
    fn new(insts: &'a [Instruction]) -> Self {
        Self {
            insts,
            deps: vec![Dependencies::default(); insts.len()],
        }
    }

    fn reads(&self, pc: Pc) -> impl Iterator<Item = Register> {
        self.insts[pc]
            .op
            .reads()
            .into_iter()
            .filter(Register::is_general)
    }

    fn write(&self, writers: &mut Writers, pc: Pc) {
        if let Some(dst) = self.insts[pc].op.dst().filter(Register::is_general) {
            writers.insert(dst, pc);
        }
    }

    fn scan_pre(&mut self, sections: &Sections) -> Writers {
        let mut writers = Writers::new();

        for pc in sections.pre.clone() {
            for reg in self.reads(pc).collect::<Vec<_>>() {
                if let Some(&producer) = writers.get(&reg) {
                    self.deps[pc].local.insert(reg, producer);
                }
            }

            self.write(&mut writers, pc);
        }

        writers
    }

    fn scan_body(&mut self, sections: &Sections, pre_writers: &Writers) -> Writers {
        let mut writers = Writers::new();
        let mut read_first = BTreeSet::new();

        for pc in sections.body.clone() {
            for reg in self.reads(pc).collect::<Vec<_>>() {
                match writers.get(&reg) {
                    Some(&producer) => {
                        self.deps[pc].local.insert(reg, producer);
                    }

                    None => {
                        read_first.insert(reg);
                    }
                }
            }

            self.write(&mut writers, pc);
        }

        // Only values the body reads before overwriting flow into it.
        let live_in: Writers = pre_writers
            .iter()
            .filter(|(reg, _)| read_first.contains(*reg))
            .map(|(&reg, &pc)| (reg, pc))
            .collect();

        debug!("{} registers are live into the loop", live_in.len());

        for pc in sections.body.clone() {
            for reg in self.reads(pc).collect::<Vec<_>>() {
                if self.deps[pc].local.contains_key(&reg) {
                    continue;
                }

                match (live_in.get(&reg), writers.get(&reg)) {
                    (Some(&init), Some(&body)) => {
                        self.deps[pc]
                            .interloop
                            .insert(reg, Carried { init, body });
                    }

                    (Some(&init), None) => {
                        self.deps[pc].invariant.insert(reg, init);
                    }

                    (None, _) => {}
                }
            }
        }

        writers
    }

    fn scan_post(&mut self, sections: &Sections, pre_writers: &Writers, body_writers: &Writers) {
        let mut writers = Writers::new();

        for pc in sections.post.clone() {
            for reg in self.reads(pc).collect::<Vec<_>>() {
                let deps = &mut self.deps[pc];

                if let Some(&producer) = writers.get(&reg) {
                    deps.local.insert(reg, producer);
                } else if let Some(&producer) = body_writers.get(&reg) {
                    deps.post_loop.insert(reg, producer);
                } else if let Some(&producer) = pre_writers.get(&reg) {
                    deps.invariant.insert(reg, producer);
                }
            }

            self.write(&mut writers, pc);
        }
    }
}
