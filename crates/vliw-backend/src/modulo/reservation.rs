use vliw_common::bundle::Slot;
use vliw_common::inst::Unit;

/// The modulo reservation table. A slot taken at some offset of the loop body
/// is taken at every offset with the same residue modulo the interval.
#[derive(Clone, Debug)]
pub struct Reservation {
    rows: Vec<[bool; Slot::COUNT]>,
}

impl Reservation {
    pub fn new(ii: usize) -> Self {
        Self {
            rows: vec![[false; Slot::COUNT]; ii],
        }
    }

    fn row(&self, offset: usize) -> &[bool; Slot::COUNT] {
        &self.rows[offset % self.rows.len()]
    }

    /// The first slot of the unit that is free at this body offset.
    pub fn free(&self, offset: usize, unit: Unit) -> Option<Slot> {
        let row = self.row(offset);
        Slot::for_unit(unit)
            .iter()
            .copied()
            .find(|slot| !row[slot.index()])
    }

    pub fn reserve(&mut self, offset: usize, slot: Slot) {
        let len = self.rows.len();
        let taken = &mut self.rows[offset % len][slot.index()];
        assert!(!*taken, "{slot:?} is already reserved at offset {offset}");
        *taken = true;
    }
}
