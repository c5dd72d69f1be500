//! Bundles are the VLIW issue groups the schedulers fill, and a [`Schedule`]
//! is the final bundle sequence with its loop body region.

mod serialize;


use std::fmt;
use std::ops::Range;

use crate::inst::{Instruction, Register, Unit};

/// A slot of a bundle. The declaration order is the wire order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Slot {
    Alu1,
    Alu2,
    Mult,
    Mem,
    Branch,
}

impl Slot {
    pub const COUNT: usize = 5;

    pub const ALL: [Slot; Self::COUNT] = [
        Self::Alu1,
        Self::Alu2,
        Self::Mult,
        Self::Mem,
        Self::Branch,
    ];

    /// The slots an instruction of the given unit may occupy, in order of
    /// preference.
    pub fn for_unit(unit: Unit) -> &'static [Slot] {
        match unit {
            Unit::Alu => &[Self::Alu1, Self::Alu2],
            Unit::Mult => &[Self::Mult],
            Unit::Mem => &[Self::Mem],
            Unit::Branch => &[Self::Branch],
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// An instruction as issued in a bundle, optionally guarded by a predicate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Slotted {
    pub guard: Option<Register>,
    pub inst: Instruction,
}

impl Slotted {
    pub fn new(inst: Instruction) -> Self {
        Self { guard: None, inst }
    }

    pub fn guarded(guard: Register, inst: Instruction) -> Self {
        Self {
            guard: Some(guard),
            inst,
        }
    }
}

impl fmt::Display for Slotted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(guard) = self.guard {
            write!(f, "({guard}) ")?;
        }

        write!(f, "{}", self.inst)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bundle {
    slots: [Option<Slotted>; Slot::COUNT],
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&Slotted> {
        self.slots[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut Slotted> {
        self.slots[slot.index()].as_mut()
    }

    pub fn take(&mut self, slot: Slot) -> Option<Slotted> {
        self.slots[slot.index()].take()
    }

    /// Put an item into a specific slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already occupied, or if the instruction cannot
    /// issue on that slot.
    pub fn put(&mut self, slot: Slot, item: Slotted) {
        let unit = item.inst.unit();
        assert!(
            unit.map_or(false, |unit| Slot::for_unit(unit).contains(&slot)),
            "`{}` cannot issue on {slot:?}",
            item.inst
        );

        let old = self.slots[slot.index()].replace(item);
        assert!(old.is_none(), "{slot:?} is already occupied");
    }

    /// The first free slot the given unit may use.
    pub fn free_slot(&self, unit: Unit) -> Option<Slot> {
        Slot::for_unit(unit)
            .iter()
            .copied()
            .find(|slot| self.slots[slot.index()].is_none())
    }

    /// Place an item in the first free slot of its unit, returning the slot it
    /// was put in.
    ///
    /// # Panics
    ///
    /// Panics if the instruction has no functional unit (i.e. `nop`).
    pub fn insert(&mut self, item: Slotted) -> Option<Slot> {
        let unit = match item.inst.unit() {
            Some(unit) => unit,
            None => unreachable!("`{}` has no functional unit", item.inst),
        };

        let slot = self.free_slot(unit)?;
        self.slots[slot.index()] = Some(item);
        Some(slot)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// The occupied slots, in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Slotted)> {
        Slot::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter_map(|(slot, item)| item.as_ref().map(|item| (slot, item)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Slot, &mut Slotted)> {
        Slot::ALL
            .into_iter()
            .zip(self.slots.iter_mut())
            .filter_map(|(slot, item)| item.as_mut().map(|item| (slot, item)))
    }
}

/// A bundle sequence split into pre-loop, loop body and post-loop regions.
/// The regions are tracked by offsets, not by the bundles themselves.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Schedule {
    pub bundles: Vec<Bundle>,
    pub body: Range<usize>,
}

impl Schedule {
    /// A schedule without a loop body.
    pub fn straight(bundles: Vec<Bundle>) -> Self {
        let end = bundles.len();
        Self {
            bundles,
            body: end..end,
        }
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn has_loop(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn pre_loop(&self) -> &[Bundle] {
        &self.bundles[..self.body.start]
    }

    pub fn loop_body(&self) -> &[Bundle] {
        &self.bundles[self.body.clone()]
    }

    pub fn post_loop(&self) -> &[Bundle] {
        &self.bundles[self.body.end..]
    }

    /// All issued items together with the index of their bundle.
    pub fn items(&self) -> impl Iterator<Item = (usize, Slot, &Slotted)> {
        self.bundles
            .iter()
            .enumerate()
            .flat_map(|(at, bundle)| bundle.iter().map(move |(slot, item)| (at, slot, item)))
    }
}
