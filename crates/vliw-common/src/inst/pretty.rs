use std::fmt;

use super::{Instruction, MovSource, Op, Register};

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General(num) => write!(f, "x{num}"),
            Self::Predicate(num) => write!(f, "p{num}"),
            Self::LoopCount => write!(f, "LC"),
            Self::EpilogueCount => write!(f, "EC"),
        }
    }
}

impl fmt::Display for MovSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "{reg}"),
            Self::Immediate(imm) => write!(f, "{imm}"),
            Self::Predicate(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().mnemonic();
        match self {
            Self::Add { dst, lhs, rhs } | Self::Sub { dst, lhs, rhs } | Self::Mulu { dst, lhs, rhs } => {
                write!(f, "{name} {dst}, {lhs}, {rhs}")
            }
            Self::Addi { dst, src, imm } => write!(f, "{name} {dst}, {src}, {imm}"),
            Self::Ld { dst, offset, base } => write!(f, "{name} {dst}, {offset}({base})"),
            Self::St { src, offset, base } => write!(f, "{name} {src}, {offset}({base})"),
            Self::Mov { dst, src } => write!(f, "{name} {dst}, {src}"),
            Self::Loop { target } | Self::LoopPip { target } => write!(f, "{name} {target}"),
            Self::Nop => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.op.fmt(f)
    }
}
