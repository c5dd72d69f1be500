//! Register numbering shared by both allocators.


use std::collections::BTreeMap;

use vliw_common::inst::Register;

use crate::error::{RegisterKind, ScheduleError};

/// A counter handing out register numbers in increasing order up to an
/// inclusive limit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fresh {
    next: u32,
    limit: u32,
    kind: RegisterKind,
}

impl Fresh {
    pub fn new(kind: RegisterKind, first: u32, limit: u32) -> Self {
        Self {
            next: first,
            limit,
            kind,
        }
    }

    /// Numbers `x1` to `x95` for the list schedule.
    pub fn general() -> Self {
        Self::new(RegisterKind::Static, 1, 95)
    }

    /// Numbers `x1` to `x31`.
    pub fn statics() -> Self {
        Self::new(RegisterKind::Static, 1, 31)
    }

    /// Numbers `x32` to `x95`.
    pub fn rotating() -> Self {
        Self::new(RegisterKind::Rotating, 32, 95)
    }

    pub fn next(&mut self) -> Result<Register, ScheduleError> {
        self.take(1)
    }

    /// Reserve `count` consecutive numbers and return the first of them.
    pub fn take(&mut self, count: u32) -> Result<Register, ScheduleError> {
        let first = self.next;
        let last = first + count.max(1) - 1;

        if last > self.limit {
            return Err(ScheduleError::RegistersExhausted {
                kind: self.kind,
                limit: self.limit,
            });
        }

        self.next = last + 1;
        Ok(Register::General(first))
    }

    /// The number the next call to [`Fresh::next`] would hand out.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// The register that a value written to the rotating register `base` during
/// stage `written` is found in when read during stage `read`. `lag` is the
/// number of iterations between the write and the read.
///
/// # Panics
///
/// Panics if `base` is not a general register or the result is negative.
pub fn rotated(base: Register, written: usize, read: usize, lag: usize) -> Register {
    let Register::General(base) = base else {
        unreachable!("rotating base {base:?} is not a general register");
    };

    let num = (base as usize + read + lag)
        .checked_sub(written)
        .and_then(|num| u32::try_from(num).ok());

    match num {
        Some(num) => Register::General(num),
        None => unreachable!("rotating register x{base} read {written} stages before it is written"),
    }
}

/// Numbers the true inputs of a program. Every input register gets one
/// number, which all of its reads share.
#[derive(Debug, Default)]
pub struct InputBinder {
    bound: BTreeMap<Register, Register>,
}

impl InputBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, fresh: &mut Fresh, original: Register) -> Result<Register, ScheduleError> {
        if let Some(&reg) = self.bound.get(&original) {
            return Ok(reg);
        }

        let reg = fresh.next()?;
        self.bound.insert(original, reg);
        Ok(reg)
    }
}
