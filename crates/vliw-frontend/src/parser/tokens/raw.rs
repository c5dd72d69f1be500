use logos::Logos;

/// Raw tokens of a single assembly line. Numbers are lexed loosely and only
/// checked when the parser knows an immediate is expected, so that a typo like
/// `12a` is reported as a malformed immediate rather than an unknown character.
#[derive(Logos, Clone, Debug, Eq, PartialEq)]
pub enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_.]*", |lexer| lexer.slice().to_string())]
    Name(String),

    #[regex(r"[+\-]?[0-9][0-9A-Za-z_]*", |lexer| lexer.slice().to_string())]
    Number(String),

    #[token(",")]
    Comma,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[error]
    #[regex(r"[ \r\t\n\f]+", logos::skip)]
    Error,
}
