use std::ops::Range;

use vliw_common::inst::{Instruction, Pc};

/// The three basic blocks of a program around its single loop. The loop body
/// includes the branch as its last instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sections {
    pub pre: Range<Pc>,
    pub body: Range<Pc>,
    pub post: Range<Pc>,
}

impl Sections {
    /// Split a program at its first loop branch. Without a branch everything
    /// is pre-loop code and the other sections are empty ranges at the end.
    pub fn split(insts: &[Instruction]) -> Self {
        let len = insts.len();
        let branch = insts
            .iter()
            .position(|inst| inst.is_branch())
            .map(|pc| (pc, insts[pc].op));

        match branch {
            None => Self {
                pre: 0..len,
                body: len..len,
                post: len..len,
            },

            Some((pc, op)) => {
                let target = match op.target() {
                    Some(target) if target >= 0 && target as usize <= pc => target as usize,
                    _ => unreachable!("loop target of instruction {pc} is out of range"),
                };

                Self {
                    pre: 0..target,
                    body: target..pc + 1,
                    post: pc + 1..len,
                }
            }
        }
    }

    pub fn has_loop(&self) -> bool {
        !self.body.is_empty()
    }

    /// The pc of the loop branch.
    pub fn branch(&self) -> Option<Pc> {
        self.has_loop().then(|| self.body.end - 1)
    }

    /// The loop body without its branch.
    pub fn body_ops(&self) -> Range<Pc> {
        match self.branch() {
            Some(branch) => self.body.start..branch,
            None => self.body.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.post.end
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
