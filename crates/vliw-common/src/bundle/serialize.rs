//! Wire format: a schedule is an array of bundles, each a five element array
//! `[ALU1, ALU2, Mult, Mem, Branch]` of `null` or the rendered instruction.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::{Bundle, Schedule, Slot};

impl Serialize for Bundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(Slot::COUNT))?;
        for slot in Slot::ALL {
            seq.serialize_element(&self.get(slot).map(ToString::to_string))?;
        }
        seq.end()
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bundles.serialize(serializer)
    }
}
