//! The instruction model: opcodes, registers, operands and the functional unit
//! and latency rules that drive both schedulers.

mod pretty;


/// Index of an instruction in the parsed program.
pub type Pc = usize;

/// Number of general-purpose (and predicate) registers per class.
pub const REGISTER_COUNT: u32 = 96;

/// The longest latency of any operation.
pub const MAX_LATENCY: usize = 3;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Register {
    General(u32),
    Predicate(u32),
    LoopCount,
    EpilogueCount,
}

impl Register {
    pub fn is_general(&self) -> bool {
        matches!(self, Self::General(_))
    }
}

/// The functional unit class an operation issues on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Unit {
    Alu,
    Mult,
    Mem,
    Branch,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Opcode {
    Add,
    Addi,
    Sub,
    Mulu,
    Ld,
    St,
    Mov,
    Loop,
    LoopPip,
    Nop,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Self::Add,
        Self::Addi,
        Self::Sub,
        Self::Mulu,
        Self::Ld,
        Self::St,
        Self::Mov,
        Self::Loop,
        Self::LoopPip,
        Self::Nop,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Addi => "addi",
            Self::Sub => "sub",
            Self::Mulu => "mulu",
            Self::Ld => "ld",
            Self::St => "st",
            Self::Mov => "mov",
            Self::Loop => "loop",
            Self::LoopPip => "loop.pip",
            Self::Nop => "nop",
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|opcode| opcode.mnemonic() == mnemonic)
    }

    /// The unit this opcode issues on. `nop` occupies no unit at all.
    pub fn unit(&self) -> Option<Unit> {
        match self {
            Self::Add | Self::Addi | Self::Sub | Self::Mov => Some(Unit::Alu),
            Self::Mulu => Some(Unit::Mult),
            Self::Ld | Self::St => Some(Unit::Mem),
            Self::Loop | Self::LoopPip => Some(Unit::Branch),
            Self::Nop => None,
        }
    }

    /// Number of bundles until the result of this opcode can be read.
    pub fn latency(&self) -> usize {
        match self {
            Self::Mulu => 3,
            _ => 1,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Loop | Self::LoopPip)
    }
}

/// The source operand of a `mov`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MovSource {
    Register(Register),
    Immediate(i64),
    Predicate(bool),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Op {
    Add {
        dst: Register,
        lhs: Register,
        rhs: Register,
    },
    Addi {
        dst: Register,
        src: Register,
        imm: i64,
    },
    Sub {
        dst: Register,
        lhs: Register,
        rhs: Register,
    },
    Mulu {
        dst: Register,
        lhs: Register,
        rhs: Register,
    },
    Ld {
        dst: Register,
        offset: i64,
        base: Register,
    },
    St {
        src: Register,
        offset: i64,
        base: Register,
    },
    Mov {
        dst: Register,
        src: MovSource,
    },
    Loop {
        target: i64,
    },
    LoopPip {
        target: i64,
    },
    Nop,
}

impl Op {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Add { .. } => Opcode::Add,
            Self::Addi { .. } => Opcode::Addi,
            Self::Sub { .. } => Opcode::Sub,
            Self::Mulu { .. } => Opcode::Mulu,
            Self::Ld { .. } => Opcode::Ld,
            Self::St { .. } => Opcode::St,
            Self::Mov { .. } => Opcode::Mov,
            Self::Loop { .. } => Opcode::Loop,
            Self::LoopPip { .. } => Opcode::LoopPip,
            Self::Nop => Opcode::Nop,
        }
    }

    /// The register written by this operation, if any.
    pub fn dst(&self) -> Option<Register> {
        match self {
            Self::Add { dst, .. }
            | Self::Addi { dst, .. }
            | Self::Sub { dst, .. }
            | Self::Mulu { dst, .. }
            | Self::Ld { dst, .. }
            | Self::Mov { dst, .. } => Some(*dst),
            Self::St { .. } | Self::Loop { .. } | Self::LoopPip { .. } | Self::Nop => None,
        }
    }

    pub fn dst_mut(&mut self) -> Option<&mut Register> {
        match self {
            Self::Add { dst, .. }
            | Self::Addi { dst, .. }
            | Self::Sub { dst, .. }
            | Self::Mulu { dst, .. }
            | Self::Ld { dst, .. }
            | Self::Mov { dst, .. } => Some(dst),
            Self::St { .. } | Self::Loop { .. } | Self::LoopPip { .. } | Self::Nop => None,
        }
    }

    /// The registers read by this operation, in operand order. The order is
    /// the same as for [`Op::reads_mut`].
    pub fn reads(&self) -> Vec<Register> {
        match self {
            Self::Add { lhs, rhs, .. } | Self::Sub { lhs, rhs, .. } | Self::Mulu { lhs, rhs, .. } => {
                vec![*lhs, *rhs]
            }
            Self::Addi { src, .. } => vec![*src],
            Self::Ld { base, .. } => vec![*base],
            Self::St { src, base, .. } => vec![*src, *base],
            Self::Mov {
                src: MovSource::Register(src),
                ..
            } => vec![*src],
            Self::Mov { .. } | Self::Loop { .. } | Self::LoopPip { .. } | Self::Nop => Vec::new(),
        }
    }

    pub fn reads_mut(&mut self) -> Vec<&mut Register> {
        match self {
            Self::Add { lhs, rhs, .. } | Self::Sub { lhs, rhs, .. } | Self::Mulu { lhs, rhs, .. } => {
                vec![lhs, rhs]
            }
            Self::Addi { src, .. } => vec![src],
            Self::Ld { base, .. } => vec![base],
            Self::St { src, base, .. } => vec![src, base],
            Self::Mov {
                src: MovSource::Register(src),
                ..
            } => vec![src],
            Self::Mov { .. } | Self::Loop { .. } | Self::LoopPip { .. } | Self::Nop => Vec::new(),
        }
    }

    /// The branch target of a loop instruction.
    pub fn target(&self) -> Option<i64> {
        match self {
            Self::Loop { target } | Self::LoopPip { target } => Some(*target),
            _ => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut i64> {
        match self {
            Self::Loop { target } | Self::LoopPip { target } => Some(target),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Instruction {
    /// Position in the parsed program. Instructions synthesized by the
    /// scheduler have none.
    pub pc: Option<Pc>,
    pub op: Op,
}

impl Instruction {
    pub fn new(pc: Pc, op: Op) -> Self {
        Self { pc: Some(pc), op }
    }

    pub fn synthesized(op: Op) -> Self {
        Self { pc: None, op }
    }

    pub fn opcode(&self) -> Opcode {
        self.op.opcode()
    }

    pub fn unit(&self) -> Option<Unit> {
        self.opcode().unit()
    }

    pub fn latency(&self) -> usize {
        self.opcode().latency()
    }

    pub fn is_branch(&self) -> bool {
        self.opcode().is_branch()
    }
}
