//! Loop structure validation. A program contains at most one loop branch, and
//! that branch jumps backwards to an instruction at or before itself.

use log::{info, trace};
use vliw_common::inst::{Instruction, Op};
use vliw_common::message::{Messages, Span};

pub fn check(messages: &mut Messages, spans: &[Span], insts: &[Instruction]) {
    info!("beginning structure check");

    let mut first: Option<Span> = None;

    for (index, inst) in insts.iter().enumerate() {
        let target = match inst.op {
            Op::Loop { target } | Op::LoopPip { target } => target,
            _ => continue,
        };

        let span = spans[index];

        if let Some(first) = first {
            messages.at(span).structure_second_loop(index, first);
            continue;
        }

        first = Some(span);

        let in_range = usize::try_from(target).map_or(false, |target| target <= index);
        if !in_range {
            messages.at(span).structure_loop_target(index, target);
        }
    }

    trace!("done structure check");
}
