//! Each instruction string is tokenized on its own. Spans are offset so that
//! they point into the whole program, which the driver renders as the input
//! lines joined by newlines.

mod raw;


use logos::Logos;
use vliw_common::message::Span;

pub use self::raw::RawToken;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: RawToken,
    pub span: Span,
}

/// Tokenize a single line starting at byte `offset` of the program. Returns
/// the span of the first invalid character on failure.
pub fn tokenize(file: usize, offset: usize, line: &str) -> Result<Vec<Token>, Span> {
    RawToken::lexer(line)
        .spanned()
        .map(|(kind, range)| {
            let span = Span::new(file, offset + range.start, offset + range.end);
            match kind {
                RawToken::Error => Err(span),
                kind => Ok(Token { kind, span }),
            }
        })
        .collect()
}
