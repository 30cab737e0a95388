use std::time::SystemTime;

use crate::interpreter::token::{Token, TokenType};

/// The type tag of an evaluated variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Holds a number.
    Numeric,
    /// Holds a string.
    String,
    /// Holds a list.
    List,
    /// Holds a set.
    Set,
    /// Stands for a free symbol in algebraic formulas; its set only provides
    /// sample values.
    Algebraic,
}

impl VariableType {
    /// Derives the type tag from a value.
    #[must_use]
    pub const fn of(value: &Token) -> Self {
        match value.kind() {
            TokenType::String => Self::String,
            TokenType::List => Self::List,
            TokenType::Set => Self::Set,
            _ => Self::Numeric,
        }
    }
}

/// A named value stored in an evaluation scope.
///
/// The timestamp records when the binding was made, so redefinitions can be
/// told apart from older bindings.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     input_stream::Position,
///     token::Token,
///     value::variable::{Variable, VariableType},
/// };
///
/// let x = Variable::new("x", Token::number(2.0, Position::default()), VariableType::Algebraic, None);
/// assert_eq!(x.to_string(), "x");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The variable's name.
    pub name:      String,
    /// The bound value; for algebraic variables the set of sample values.
    pub value:     Token,
    /// The type tag.
    pub kind:      VariableType,
    /// When the binding was made.
    pub timestamp: SystemTime,
}

impl Variable {
    /// Creates a variable, stamped with the current time unless a timestamp
    /// is given.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Token, kind: VariableType, timestamp: Option<SystemTime>) -> Self {
        Self { name: name.into(),
               value,
               kind,
               timestamp: timestamp.unwrap_or_else(SystemTime::now) }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            VariableType::Algebraic => write!(f, "{}", self.name),
            _ => write!(f, "{}", self.value),
        }
    }
}
