use crate::{
    error::{EvaluationError, EvaluationErrorKind},
    interpreter::{input_stream::Position, value::lazylist::Lazylist},
    util::num::format_number,
};

/// Maximum number of scalar elements a list may hold, counted recursively
/// through nested lists.
pub const MAX_LIST_ELEMENTS: usize = 1000;

/// The kind of a token.
///
/// The lexer only produces the "syntactic" kinds; `VARIABLE`, `FUNCTION`,
/// `CONSTANT` and `RANGE_SEPARATOR` are assigned by the parser, while `LIST`
/// and `SET` exist only as evaluation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A numeric literal or numeric result.
    Number,
    /// A string literal or string result.
    String,
    /// A name whose role has not been decided yet.
    Identifier,
    /// A name used as a variable.
    Variable,
    /// A name used as a function.
    Function,
    /// A named constant such as `pi` or `π`.
    Constant,
    /// An operator, including internal opcodes such as `%%ternary`.
    Operator,
    /// `(`
    OpeningParen,
    /// `)`
    ClosingParen,
    /// `[`
    OpeningBracket,
    /// `]`
    ClosingBracket,
    /// `{`
    OpeningBrace,
    /// `}`
    ClosingBrace,
    /// `,`
    ArgSeparator,
    /// `:` inside a set or list literal.
    RangeSeparator,
    /// `;`
    EndOfStatement,
    /// A reserved word such as `for`.
    ReservedWord,
    /// An ordered list value.
    List,
    /// A set value.
    Set,
    /// The `\` marker forcing a function call.
    Prefix,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Identifier => "IDENTIFIER",
            Self::Variable => "VARIABLE",
            Self::Function => "FUNCTION",
            Self::Constant => "CONSTANT",
            Self::Operator => "OPERATOR",
            Self::OpeningParen => "OPENING_PAREN",
            Self::ClosingParen => "CLOSING_PAREN",
            Self::OpeningBracket => "OPENING_BRACKET",
            Self::ClosingBracket => "CLOSING_BRACKET",
            Self::OpeningBrace => "OPENING_BRACE",
            Self::ClosingBrace => "CLOSING_BRACE",
            Self::ArgSeparator => "ARG_SEPARATOR",
            Self::RangeSeparator => "RANGE_SEPARATOR",
            Self::EndOfStatement => "END_OF_STATEMENT",
            Self::ReservedWord => "RESERVED_WORD",
            Self::List => "LIST",
            Self::Set => "SET",
            Self::Prefix => "PREFIX",
        };
        write!(f, "{name}")
    }
}

/// Mantissa and exponent of a number written in scientific notation, kept
/// verbatim so the literal can be reconstructed (`3e8` versus `3*e8`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScientificNotation {
    /// Digits before the exponent marker, e.g. `3` or `1.5`.
    pub mantissa: String,
    /// Exponent digits including an optional sign, e.g. `8` or `-2`.
    pub exponent: String,
}

/// The payload of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// A number.
    Number(f64),
    /// Text: string contents, identifier names and operator symbols.
    Str(String),
    /// Ordered elements of a list.
    List(Vec<Token>),
    /// Elements of a set, kept lazily so ranges are never expanded.
    Set(Lazylist),
}

/// A lexical token, which doubles as the runtime value representation.
///
/// Tokens are immutable once built: all fields are private and only exposed
/// through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind:     TokenType,
    value:    TokenValue,
    position: Position,
    metadata: Option<ScientificNotation>,
}

impl Token {
    /// Creates a token of the given kind.
    #[must_use]
    pub const fn new(kind: TokenType, value: TokenValue, position: Position) -> Self {
        Self { kind,
               value,
               position,
               metadata: None }
    }

    /// Creates a `NUMBER` token.
    #[must_use]
    pub const fn number(value: f64, position: Position) -> Self {
        Self::new(TokenType::Number, TokenValue::Number(value), position)
    }

    /// Creates a `STRING` token.
    #[must_use]
    pub fn string(value: impl Into<String>, position: Position) -> Self {
        Self::new(TokenType::String, TokenValue::Str(value.into()), position)
    }

    /// Creates a token whose value is a piece of text, e.g. an operator or an
    /// identifier.
    #[must_use]
    pub fn text(kind: TokenType, value: impl Into<String>, position: Position) -> Self {
        Self::new(kind, TokenValue::Str(value.into()), position)
    }

    /// Creates a `LIST` token.
    #[must_use]
    pub const fn list(elements: Vec<Self>, position: Position) -> Self {
        Self::new(TokenType::List, TokenValue::List(elements), position)
    }

    /// Creates a `SET` token.
    #[must_use]
    pub const fn set(elements: Lazylist, position: Position) -> Self {
        Self::new(TokenType::Set, TokenValue::Set(elements), position)
    }

    /// Returns a copy of this token carrying scientific notation metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ScientificNotation) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns a copy of this token with a different kind, keeping value and
    /// position.
    #[must_use]
    pub fn with_kind(mut self, kind: TokenType) -> Self {
        self.kind = kind;
        self
    }

    /// Returns a copy of this token moved to another position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// The token's kind.
    #[must_use]
    pub const fn kind(&self) -> TokenType {
        self.kind
    }

    /// The token's payload.
    #[must_use]
    pub const fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Row of the token's first character.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.position.row
    }

    /// Column of the token's first character.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.position.column
    }

    /// Position of the token's first character.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Scientific notation metadata, for numbers written like `3e8`.
    #[must_use]
    pub const fn metadata(&self) -> Option<&ScientificNotation> {
        self.metadata.as_ref()
    }

    /// Returns the number if this token holds one.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the text if this token holds text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if the token is the given operator or opcode.
    #[must_use]
    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenType::Operator && self.as_str() == Some(symbol)
    }

    /// Converts a native value into a typed token.
    ///
    /// - With `kind == Some(TokenType::Number)` the value must be numeric or
    ///   a string holding a number.
    /// - Lists are wrapped recursively and may not contain more than
    ///   [`MAX_LIST_ELEMENTS`] scalars, counted through all nesting levels.
    /// - With `kind == Some(TokenType::Set)` a list is wrapped as a set.
    /// - A token of another kind is unpacked and coerced like a native value,
    ///   so its kind and value always agree.
    ///
    /// # Errors
    /// `InvalidWrap` if numeric coercion fails, `OversizedCollection` if a
    /// list is too large.
    ///
    /// # Example
    /// ```
    /// use qformula::interpreter::{
    ///     input_stream::Position,
    ///     token::{RawValue, Token, TokenType},
    /// };
    ///
    /// let token = Token::wrap(RawValue::from(vec![1.0, 2.0]), None, Position::default()).unwrap();
    /// assert_eq!(token.kind(), TokenType::List);
    ///
    /// let number = Token::wrap("2.5".into(), Some(TokenType::Number), Position::default()).unwrap();
    /// assert_eq!(number.as_number(), Some(2.5));
    /// ```
    pub fn wrap(raw: RawValue, kind: Option<TokenType>, position: Position) -> Result<Self, EvaluationError> {
        if matches!(raw, RawValue::List(_)) && raw.count_scalars() > MAX_LIST_ELEMENTS {
            return Err(EvaluationErrorKind::OversizedCollection.into());
        }

        match (raw, kind) {
            (RawValue::Token(token), None) => Ok(*token),
            (RawValue::Token(token), Some(kind)) if token.kind() == kind => Ok(*token),
            (RawValue::Token(token), Some(kind)) => Self::wrap(token.unpack(), Some(kind), token.position()),
            (RawValue::Number(n), None | Some(TokenType::Number)) => Ok(Self::number(n, position)),
            (RawValue::Number(n), Some(TokenType::String)) => {
                Ok(Self::string(format_number(n), position))
            },
            (RawValue::Str(s), Some(TokenType::Number)) => {
                s.trim()
                 .parse::<f64>()
                 .map(|n| Self::number(n, position))
                 .map_err(|_| invalid_wrap(&format!("\"{s}\""), TokenType::Number))
            },
            (RawValue::Str(s), None | Some(TokenType::String)) => Ok(Self::string(s, position)),
            (RawValue::List(items), None | Some(TokenType::List)) => {
                let elements = items.into_iter()
                                    .map(|item| Self::wrap(item, None, position))
                                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::list(elements, position))
            },
            (RawValue::List(items), Some(TokenType::Set)) => {
                let mut set = Lazylist::new();
                for item in items {
                    set.append_value(Self::wrap(item, None, position)?);
                }
                Ok(Self::set(set, position))
            },
            (RawValue::Set(set), None | Some(TokenType::Set)) => Ok(Self::set(set, position)),
            (raw, Some(kind)) => Err(invalid_wrap(&raw.describe(), kind)),
        }
    }

    /// Converts the token back into a native value.
    ///
    /// Scalars come back as-is, lists as nested native lists and sets as
    /// their lazy element container. Any other token yields its bare value.
    #[must_use]
    pub fn unpack(&self) -> RawValue {
        match &self.value {
            TokenValue::Number(n) => RawValue::Number(*n),
            TokenValue::Str(s) => RawValue::Str(s.clone()),
            TokenValue::List(elements) => RawValue::List(elements.iter().map(Self::unpack).collect()),
            TokenValue::Set(set) => RawValue::Set(set.clone()),
        }
    }

    /// Renders the value as a literal that the parser reads back to the same
    /// value; strings are quoted and escaped.
    #[must_use]
    pub fn to_definition(&self) -> String {
        match &self.value {
            TokenValue::Str(s) if self.kind == TokenType::String => {
                format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            },
            TokenValue::List(elements) => {
                let inner = elements.iter().map(Self::to_definition).collect::<Vec<_>>();
                format!("[{}]", inner.join(", "))
            },
            TokenValue::Set(set) => set.to_definition(),
            _ => self.to_string(),
        }
    }

    /// Counts scalar elements, descending into nested lists.
    #[must_use]
    pub fn count_scalars(&self) -> usize {
        match &self.value {
            TokenValue::List(elements) => elements.iter().map(Self::count_scalars).sum(),
            _ => 1,
        }
    }

    /// Short description of the value for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenType::Number => format!("number {self}"),
            TokenType::String => format!("string \"{self}\""),
            TokenType::List => "a list".to_string(),
            TokenType::Set => "a set".to_string(),
            _ => format!("'{self}'"),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            TokenValue::Number(n) => write!(f, "{}", format_number(*n)),
            TokenValue::Str(s) => write!(f, "{s}"),
            TokenValue::List(_) | TokenValue::Set(_) => write!(f, "{}", self.to_definition()),
        }
    }
}

fn invalid_wrap(found: &str, kind: TokenType) -> EvaluationError {
    EvaluationErrorKind::InvalidWrap { found: found.to_string(),
                                       kind:  kind.to_string(), }.into()
}

/// A native value that can be wrapped into a token.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A number.
    Number(f64),
    /// A string.
    Str(String),
    /// A (possibly nested) list.
    List(Vec<RawValue>),
    /// A lazily stored set.
    Set(Lazylist),
    /// An already built token.
    Token(Box<Token>),
}

impl RawValue {
    /// Counts scalar elements, descending into nested lists, including lists
    /// that are already wrapped. A set counts as one element.
    #[must_use]
    pub fn count_scalars(&self) -> usize {
        match self {
            Self::List(items) => items.iter().map(Self::count_scalars).sum(),
            Self::Token(token) => token.count_scalars(),
            _ => 1,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {}", format_number(*n)),
            Self::Str(s) => format!("string \"{s}\""),
            Self::List(_) => "a list".to_string(),
            Self::Set(_) => "a set".to_string(),
            Self::Token(token) => token.describe(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Token> for RawValue {
    fn from(v: Token) -> Self {
        Self::Token(Box::new(v))
    }
}

impl<T: Into<Self>> From<Vec<T>> for RawValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
