//! Interpretation of the comma separated operand groups of one instruction.

use vliw_common::inst::{MovSource, Register, REGISTER_COUNT};
use vliw_common::message::Span;

use super::tokens::{RawToken, Token};
use super::Parser;

/// Parse a register name like `x12`, `p3`, `LC` or `EC`.
pub fn parse_register(text: &str) -> Option<Register> {
    match text {
        "LC" => return Some(Register::LoopCount),
        "EC" => return Some(Register::EpilogueCount),
        _ => {}
    }

    let mut chars = text.chars();
    let class = chars.next()?;
    let digits = chars.as_str();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let num: u32 = digits.parse().ok()?;
    if num >= REGISTER_COUNT {
        return None;
    }

    match class {
        'x' => Some(Register::General(num)),
        'p' => Some(Register::Predicate(num)),
        _ => None,
    }
}

/// Parse a signed immediate. Accepts an optional sign followed by a decimal
/// number or a `0x`, `0o` or `0b` prefixed one.
pub fn parse_immediate(text: &str) -> Option<i64> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'-' => ("-", &text[1..]),
        b'+' => ("", &text[1..]),
        _ => ("", text),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        Some("0o" | "0O") => (8, &rest[2..]),
        Some("0b" | "0B") => (2, &rest[2..]),
        _ => (10, rest),
    };

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    i64::from_str_radix(&format!("{sign}{digits}"), radix).ok()
}

/// The tokens between two commas.
#[derive(Clone, Debug)]
pub struct Group<'a> {
    pub tokens: &'a [Token],
    pub span: Span,
}

impl<'a> Group<'a> {
    pub fn new(tokens: &'a [Token], fallback: Span) -> Self {
        let span = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => first.span + last.span,
            _ => fallback,
        };

        Self { tokens, span }
    }

    fn single(&self) -> Option<&'a RawToken> {
        match self.tokens {
            [token] => Some(&token.kind),
            _ => None,
        }
    }
}

impl Parser {
    pub fn register(&mut self, index: usize, group: &Group) -> Option<Register> {
        match group.single() {
            Some(RawToken::Name(name)) => match parse_register(name) {
                Some(reg) => Some(reg),
                None => {
                    self.messages
                        .at(group.span)
                        .parse_invalid_register(index, name);
                    None
                }
            },

            _ => {
                self.messages.at(group.span).parse_malformed_operand(index);
                None
            }
        }
    }

    pub fn general(&mut self, index: usize, group: &Group) -> Option<Register> {
        let reg = self.register(index, group)?;
        if reg.is_general() {
            Some(reg)
        } else {
            self.messages.at(group.span).parse_not_general(index);
            None
        }
    }

    pub fn immediate(&mut self, index: usize, group: &Group) -> Option<i64> {
        match group.single() {
            Some(RawToken::Number(text)) => {
                let imm = parse_immediate(text);
                if imm.is_none() {
                    self.messages.at(group.span).parse_malformed_immediate(index);
                }
                imm
            }

            _ => {
                self.messages.at(group.span).parse_malformed_immediate(index);
                None
            }
        }
    }

    /// An address of the form `imm(xN)`.
    pub fn address(&mut self, index: usize, group: &Group) -> Option<(i64, Register)> {
        let (offset, base) = match group.tokens {
            [offset, Token {
                kind: RawToken::LeftParen,
                ..
            }, base, Token {
                kind: RawToken::RightParen,
                ..
            }] => (offset, base),

            _ => {
                self.messages.at(group.span).parse_malformed_address(index);
                return None;
            }
        };

        let offset = self.immediate(index, &Group::new(std::slice::from_ref(offset), group.span))?;
        let base = self.general(index, &Group::new(std::slice::from_ref(base), group.span))?;

        Some((offset, base))
    }

    /// The source of a `mov`, which depends on the class of the destination.
    pub fn mov_source(&mut self, index: usize, dst: Register, group: &Group) -> Option<MovSource> {
        match dst {
            Register::General(_) => match group.single() {
                Some(RawToken::Name(_)) => self.general(index, group).map(MovSource::Register),
                _ => self.immediate(index, group).map(MovSource::Immediate),
            },

            Register::Predicate(_) => match group.single() {
                Some(RawToken::Name(name)) if name == "true" => Some(MovSource::Predicate(true)),
                Some(RawToken::Name(name)) if name == "false" => Some(MovSource::Predicate(false)),
                _ => {
                    self.messages.at(group.span).parse_malformed_operand(index);
                    None
                }
            },

            Register::LoopCount | Register::EpilogueCount => {
                self.immediate(index, group).map(MovSource::Immediate)
            }
        }
    }
}
