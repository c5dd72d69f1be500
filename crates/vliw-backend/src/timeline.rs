//! A growing bundle sequence together with the location of every placed
//! instruction. Both schedulers build on it.

use vliw_common::bundle::{Bundle, Slot, Slotted};
use vliw_common::inst::{Instruction, Pc, Register};
use vliw_midend::Dependencies;

/// Where an instruction was issued.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Loc {
    pub bundle: usize,
    pub slot: Slot,
}

#[derive(Clone, Debug)]
pub struct Timeline<'a> {
    pub insts: &'a [Instruction],
    pub bundles: Vec<Bundle>,
    /// Indexed by pc. `nop`s are never placed.
    pub placed: Vec<Option<Loc>>,
}

impl<'a> Timeline<'a> {
    pub fn new(insts: &'a [Instruction]) -> Self {
        Self {
            insts,
            bundles: Vec::new(),
            placed: vec![None; insts.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn extend_to(&mut self, len: usize) {
        if self.bundles.len() < len {
            self.bundles.resize_with(len, Bundle::new);
        }
    }

    pub fn bundle_of(&self, pc: Pc) -> Option<usize> {
        self.placed[pc].map(|loc| loc.bundle)
    }

    /// The bundle of an instruction that must have been placed.
    pub fn at(&self, pc: Pc) -> usize {
        match self.bundle_of(pc) {
            Some(bundle) => bundle,
            None => unreachable!("instruction {pc} has not been placed"),
        }
    }

    /// The first bundle at or after `start` in which the results of all the
    /// given producers are available.
    pub fn earliest(&self, start: usize, producers: impl IntoIterator<Item = Pc>) -> usize {
        producers
            .into_iter()
            .filter_map(|pc| self.bundle_of(pc).map(|at| at + self.insts[pc].latency()))
            .fold(start, usize::max)
    }

    /// Place an instruction in the first bundle at or after `from` with a
    /// free slot of its unit, growing the sequence as needed.
    pub fn place_from(&mut self, pc: Pc, from: usize) -> usize {
        let item = Slotted::new(self.insts[pc]);
        let mut at = from;

        loop {
            self.extend_to(at + 1);
            if let Some(slot) = self.bundles[at].insert(item) {
                self.placed[pc] = Some(Loc { bundle: at, slot });
                return at;
            }

            at += 1;
        }
    }

    /// List schedule an instruction: place it at the first free slot once all
    /// of its producers are done. `nop`s are skipped.
    pub fn place_ready(&mut self, pc: Pc, start: usize, deps: &Dependencies) -> Option<usize> {
        self.insts[pc].unit()?;

        let earliest = self.earliest(start, deps.producers().map(|(_, pc)| pc));
        Some(self.place_from(pc, earliest))
    }

    /// Put an instruction into a specific slot.
    pub fn put(&mut self, pc: Pc, loc: Loc, item: Slotted) {
        self.extend_to(loc.bundle + 1);
        self.bundles[loc.bundle].put(loc.slot, item);
        self.placed[pc] = Some(loc);
    }

    pub fn item(&self, pc: Pc) -> Option<&Slotted> {
        let loc = self.placed[pc]?;
        self.bundles[loc.bundle].get(loc.slot)
    }

    pub fn item_mut(&mut self, pc: Pc) -> Option<&mut Slotted> {
        let loc = self.placed[pc]?;
        self.bundles[loc.bundle].get_mut(loc.slot)
    }

    /// The destination register an instruction currently writes.
    pub fn dst(&self, pc: Pc) -> Option<Register> {
        self.item(pc).and_then(|item| item.inst.op.dst())
    }

    /// Insert `count` empty bundles before bundle `at`. Everything from `at`
    /// onwards moves down, and branch targets pointing there follow.
    pub fn insert_bundles(&mut self, at: usize, count: usize) {
        for _ in 0..count {
            self.bundles.insert(at, Bundle::new());
        }

        for loc in self.placed.iter_mut().flatten() {
            if loc.bundle >= at {
                loc.bundle += count;
            }
        }

        for bundle in self.bundles.iter_mut() {
            for (_, item) in bundle.iter_mut() {
                if let Some(target) = item.inst.op.target_mut() {
                    if *target >= at as i64 {
                        *target += count as i64;
                    }
                }
            }
        }
    }

    /// Move an item to another bundle, keeping its slot.
    pub fn relocate(&mut self, pc: Pc, bundle: usize) {
        let Some(loc) = self.placed[pc] else {
            unreachable!("instruction {pc} has not been placed");
        };

        let item = match self.bundles[loc.bundle].take(loc.slot) {
            Some(item) => item,
            None => unreachable!("instruction {pc} is missing from its bundle"),
        };

        self.put(pc, Loc { bundle, slot: loc.slot }, item);
    }
}
