use logos::Logos;

use crate::error::UnitError;

/// A lexical token of the unit grammar.
///
/// `*` and numbers are lexed only so that the parser can reject them at the
/// right place: units multiply by juxtaposition and carry no numbers outside
/// exponents.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub enum UnitToken {
    /// Unit symbols such as `m`, `kg`, `µs`, `Ω` or `°`.
    #[regex(r"[\p{L}°_]+", |lex| lex.slice().to_string())]
    Symbol(String),
    /// Unsigned integer literals, such as the `2` of `m^2`.
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Integer(String),
    /// `^`
    #[token("^")]
    Caret,
    /// `/`
    #[token("/")]
    Slash,
    /// `*`
    #[token("*")]
    Star,
    /// `-`
    #[token("-")]
    Minus,
    /// `+`
    #[token("+")]
    Plus,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
}

impl std::fmt::Display for UnitToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(text) | Self::Integer(text) => write!(f, "{text}"),
            Self::Caret => write!(f, "^"),
            Self::Slash => write!(f, "/"),
            Self::Star => write!(f, "*"),
            Self::Minus => write!(f, "-"),
            Self::Plus => write!(f, "+"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
        }
    }
}

/// Splits a unit string into tokens paired with their byte offsets.
///
/// # Errors
/// `UnexpectedInput` for characters outside the unit alphabet.
///
/// # Example
/// ```
/// use qformula::units::lexer::{UnitToken, tokenize};
///
/// let tokens = tokenize("kg m^2").unwrap();
/// assert_eq!(tokens[0], (UnitToken::Symbol("kg".to_string()), 0));
/// assert_eq!(tokens[2], (UnitToken::Caret, 4));
/// ```
pub fn tokenize(text: &str) -> Result<Vec<(UnitToken, usize)>, UnitError> {
    let mut lexer = UnitToken::lexer(text);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span().start)),
            Err(()) => {
                return Err(UnitError::UnexpectedInput { input:  lexer.slice().to_string(),
                                                        offset: lexer.span().start, });
            },
        }
    }

    Ok(tokens)
}
