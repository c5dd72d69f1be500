use std::fmt;

use thiserror::Error;

/// The register file a number was drawn from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RegisterKind {
    Static,
    Rotating,
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Rotating => write!(f, "rotating"),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ScheduleError {
    #[error("scheduling infeasible: no initiation interval up to {max_ii} fits the loop")]
    Infeasible { max_ii: usize },

    #[error("out of {kind} registers: the program needs more than x{limit}")]
    RegistersExhausted { kind: RegisterKind, limit: u32 },
}
