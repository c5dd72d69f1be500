//! The parser turns the instruction strings of a program into [`Instruction`]s.
//!
//! Every string is one instruction and its position in the input is its pc.
//! Parsing stops at the first malformed instruction.

mod operand;
mod tokens;

#[cfg(test)]
mod tests;

use log::{debug, info, trace};
use vliw_common::inst::{Instruction, Op, Opcode};
use vliw_common::message::{Messages, Span};

use self::operand::Group;
use self::tokens::{tokenize, RawToken, Token};

/// Parse every line of a program. On failure the offending instruction is
/// described in `messages` and `None` is returned. `spans` receives the span
/// of every line, including the ones that were never parsed.
pub fn parse_lines(
    messages: &mut Messages,
    spans: &mut Vec<Span>,
    file: usize,
    lines: &[String],
) -> Option<Vec<Instruction>> {
    info!("beginning parsing");

    let mut parser = Parser::new(file);
    let mut offset = 0;

    for line in lines {
        spans.push(Span::new(file, offset, offset + line.len()));
        offset += line.len() + 1;
    }

    let mut insts = Vec::with_capacity(lines.len());
    for (index, (line, span)) in lines.iter().zip(spans.iter()).enumerate() {
        match parser.parse_line(index, span.start, line) {
            Some(op) => insts.push(Instruction::new(index, op)),
            None => {
                debug!("instruction {index} is malformed");
                messages.merge(parser.messages);
                return None;
            }
        }
    }

    trace!("done parsing");

    Some(insts)
}

pub struct Parser {
    messages: Messages,
    file: usize,
}

impl Parser {
    fn new(file: usize) -> Self {
        Self {
            messages: Messages::new(),
            file,
        }
    }

    fn parse_line(&mut self, index: usize, offset: usize, line: &str) -> Option<Op> {
        let tokens = match tokenize(self.file, offset, line) {
            Ok(tokens) => tokens,
            Err(span) => {
                self.messages.at(span).parse_invalid_character(index);
                return None;
            }
        };

        let (mnemonic, span, rest) = match tokens.split_first() {
            Some((
                Token {
                    kind: RawToken::Name(name),
                    span,
                },
                rest,
            )) => (name, *span, rest),

            Some((token, _)) => {
                let text = &line[token.span.start - offset..token.span.end - offset];
                self.messages.at(token.span).parse_unknown_mnemonic(index, text);
                return None;
            }

            None => {
                let span = Span::new(self.file, offset, offset + line.len());
                self.messages.at(span).parse_unknown_mnemonic(index, "");
                return None;
            }
        };

        let Some(opcode) = Opcode::from_mnemonic(mnemonic) else {
            self.messages.at(span).parse_unknown_mnemonic(index, mnemonic);
            return None;
        };

        let groups = split_operands(rest, span);
        let whole = groups
            .iter()
            .fold(span, |whole, group| whole + group.span);

        let expected = operand_count(opcode);
        if groups.len() != expected {
            self.messages
                .at(whole)
                .parse_operand_count(index, expected, groups.len());
            return None;
        }

        self.parse_op(index, opcode, &groups)
    }

    fn parse_op(&mut self, index: usize, opcode: Opcode, groups: &[Group]) -> Option<Op> {
        let op = match opcode {
            Opcode::Add | Opcode::Sub | Opcode::Mulu => {
                let dst = self.general(index, &groups[0])?;
                let lhs = self.general(index, &groups[1])?;
                let rhs = self.general(index, &groups[2])?;

                match opcode {
                    Opcode::Add => Op::Add { dst, lhs, rhs },
                    Opcode::Sub => Op::Sub { dst, lhs, rhs },
                    _ => Op::Mulu { dst, lhs, rhs },
                }
            }

            Opcode::Addi => {
                let dst = self.general(index, &groups[0])?;
                let src = self.general(index, &groups[1])?;
                let imm = self.immediate(index, &groups[2])?;
                Op::Addi { dst, src, imm }
            }

            Opcode::Ld => {
                let dst = self.general(index, &groups[0])?;
                let (offset, base) = self.address(index, &groups[1])?;
                Op::Ld { dst, offset, base }
            }

            Opcode::St => {
                let src = self.general(index, &groups[0])?;
                let (offset, base) = self.address(index, &groups[1])?;
                Op::St { src, offset, base }
            }

            Opcode::Mov => {
                let dst = self.register(index, &groups[0])?;
                let src = self.mov_source(index, dst, &groups[1])?;
                Op::Mov { dst, src }
            }

            Opcode::Loop => Op::Loop {
                target: self.immediate(index, &groups[0])?,
            },

            Opcode::LoopPip => Op::LoopPip {
                target: self.immediate(index, &groups[0])?,
            },

            Opcode::Nop => Op::Nop,
        };

        Some(op)
    }
}

fn operand_count(opcode: Opcode) -> usize {
    match opcode {
        Opcode::Add | Opcode::Addi | Opcode::Sub | Opcode::Mulu => 3,
        Opcode::Ld | Opcode::St | Opcode::Mov => 2,
        Opcode::Loop | Opcode::LoopPip => 1,
        Opcode::Nop => 0,
    }
}

/// Split the operand tokens at every comma. No tokens at all means no
/// operands, but a trailing comma leaves an empty last group.
fn split_operands(tokens: &[Token], mnemonic: Span) -> Vec<Group> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut groups = Vec::new();
    let mut start = 0;
    let mut fallback = mnemonic;

    for (i, token) in tokens.iter().enumerate() {
        if token.kind == RawToken::Comma {
            groups.push(Group::new(&tokens[start..i], fallback));
            start = i + 1;
            fallback = token.span;
        }
    }

    groups.push(Group::new(&tokens[start..], fallback));
    groups
}
