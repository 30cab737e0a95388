use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    interpreter::{
        input_stream::InputStream,
        parser::core::ParseResult,
        token::{ScientificNotation, Token, TokenType},
    },
};

lazy_static! {
    /// Words that can never be used as identifiers.
    pub static ref RESERVED_WORDS: HashSet<&'static str> = {
        let mut words = HashSet::new();
        words.insert("for");
        words
    };
}

/// Operators ordered so that every multi-character operator comes before
/// any of its prefixes; the first match is the longest one.
const OPERATORS: &[&str] = &["**", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "+", "-", "*", "/", "%", "^", "=", "<",
                             ">", "!", "&", "|", "~", "?", ":"];

/// Hand-written tokenizer over an [`InputStream`].
///
/// Each call to [`Lexer::next_token`] skips whitespace and comments and then
/// emits exactly one token, or `None` at the end of the input. The first
/// unrecognized character aborts lexing with a positioned error.
///
/// # Example
/// ```
/// use qformula::interpreter::{lexer::Lexer, token::TokenType};
///
/// let tokens = Lexer::new("2 x^\\sin(1e-2) # comment").tokenize().unwrap();
/// let kinds = tokens.iter().map(|t| t.kind()).collect::<Vec<_>>();
///
/// assert_eq!(kinds,
///            vec![TokenType::Number,
///                 TokenType::Identifier,
///                 TokenType::Operator,
///                 TokenType::Prefix,
///                 TokenType::Identifier,
///                 TokenType::OpeningParen,
///                 TokenType::Number,
///                 TokenType::ClosingParen]);
/// assert_eq!(tokens[6].as_number(), Some(0.01));
/// ```
#[derive(Debug, Clone)]
pub struct Lexer {
    stream: InputStream,
}

impl Lexer {
    /// Creates a lexer over the given text.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self { stream: InputStream::new(input) }
    }

    /// Reads the whole input into a token vector.
    ///
    /// # Errors
    /// The first lexical error encountered.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Reads the next token, or `None` once the input is exhausted.
    ///
    /// # Errors
    /// `UnexpectedInput` for characters that start no token, malformed
    /// numbers and `UnterminatedString` for strings running into the end of
    /// the input.
    pub fn next_token(&mut self) -> ParseResult<Option<Token>> {
        self.skip_whitespace_and_comments();

        let position = self.stream.get_position();
        let Some(current) = self.stream.peek() else {
            return Ok(None);
        };

        let token = match current {
            '0'..='9' => self.read_number()?,
            '.' if self.stream.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number()?,
            '"' | '\'' => self.read_string(current)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(),
            'π' => {
                self.stream.read();
                Token::text(TokenType::Constant, "π", position)
            },
            '\\' => {
                self.stream.read();
                Token::text(TokenType::Prefix, "\\", position)
            },
            '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' => {
                self.stream.read();
                Token::text(punctuation_type(current), current.to_string(), position)
            },
            _ => self.read_operator()?,
        };

        Ok(Some(token))
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.stream.peek() {
            if c.is_whitespace() {
                self.stream.read();
            } else if c == '#' {
                while let Some(c) = self.stream.read() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_digits(&mut self, into: &mut String) {
        while let Some(c) = self.stream.peek()
              && c.is_ascii_digit()
        {
            into.push(c);
            self.stream.read();
        }
    }

    /// Returns `true` if the stream is at an exponent marker that is followed
    /// by digits, optionally after a sign.
    fn at_exponent(&self) -> bool {
        if !matches!(self.stream.peek(), Some('e' | 'E')) {
            return false;
        }
        match self.stream.peek_nth(1) {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => self.stream.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn read_number(&mut self) -> ParseResult<Token> {
        let position = self.stream.get_position();
        let mut mantissa = String::new();

        self.read_digits(&mut mantissa);
        if self.stream.peek() == Some('.') {
            mantissa.push('.');
            self.stream.read();
            self.read_digits(&mut mantissa);
        }

        let mut exponent = None;
        if self.at_exponent() {
            self.stream.read();
            let mut digits = String::new();
            if let Some(sign @ ('+' | '-')) = self.stream.peek() {
                digits.push(sign);
                self.stream.read();
            }
            self.read_digits(&mut digits);
            exponent = Some(digits);
        }

        if self.stream.peek() == Some('.') {
            self.stream.read();
            return Err(self.stream.die(SyntaxErrorKind::UnexpectedInput { input: '.' }));
        }

        let literal = match &exponent {
            Some(exponent) => format!("{mantissa}e{exponent}"),
            None => mantissa.clone(),
        };
        let value = literal.parse::<f64>()
                           .map_err(|_| SyntaxError::new(SyntaxErrorKind::UnexpectedToken { value: literal.clone() }, position))?;

        let token = Token::number(value, position);
        Ok(match exponent {
            Some(exponent) => token.with_metadata(ScientificNotation { mantissa, exponent }),
            None => token,
        })
    }

    fn read_string(&mut self, quote: char) -> ParseResult<Token> {
        let position = self.stream.get_position();
        self.stream.read();

        let mut contents = String::new();
        loop {
            match self.stream.read() {
                None => {
                    let kind = SyntaxErrorKind::UnterminatedString { row:    position.row,
                                                                     column: position.column, };
                    return Err(SyntaxError::new(kind, self.stream.get_position()));
                },
                Some(c) if c == quote => break,
                Some('\\') => match self.stream.peek() {
                    Some(c) if c == quote || c == '\\' => {
                        contents.push(c);
                        self.stream.read();
                    },
                    Some('n') => {
                        contents.push('\n');
                        self.stream.read();
                    },
                    Some('t') => {
                        contents.push('\t');
                        self.stream.read();
                    },
                    _ => contents.push('\\'),
                },
                Some(c) => contents.push(c),
            }
        }

        Ok(Token::string(contents, position))
    }

    fn read_identifier(&mut self) -> Token {
        let position = self.stream.get_position();
        let mut name = String::new();
        while let Some(c) = self.stream.peek()
              && (c.is_ascii_alphanumeric() || c == '_')
        {
            name.push(c);
            self.stream.read();
        }

        let kind = if RESERVED_WORDS.contains(name.as_str()) { TokenType::ReservedWord } else { TokenType::Identifier };
        Token::text(kind, name, position)
    }

    fn read_operator(&mut self) -> ParseResult<Token> {
        let position = self.stream.get_position();

        for operator in OPERATORS {
            let matches = operator.chars()
                                  .enumerate()
                                  .all(|(i, c)| self.stream.peek_nth(i) == Some(c));
            if matches {
                for _ in 0..operator.chars().count() {
                    self.stream.read();
                }
                return Ok(Token::text(TokenType::Operator, *operator, position));
            }
        }

        let input = self.stream.read().unwrap_or_default();
        Err(self.stream.die(SyntaxErrorKind::UnexpectedInput { input }))
    }
}

const fn punctuation_type(c: char) -> TokenType {
    match c {
        '(' => TokenType::OpeningParen,
        ')' => TokenType::ClosingParen,
        '[' => TokenType::OpeningBracket,
        ']' => TokenType::ClosingBracket,
        '{' => TokenType::OpeningBrace,
        '}' => TokenType::ClosingBrace,
        ',' => TokenType::ArgSeparator,
        _ => TokenType::EndOfStatement,
    }
}

