use crate::interpreter::{input_stream::Position, token::Token};

/// A parsed expression statement: its RPN body, the text it was parsed from
/// and where that text starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Tokens in reverse polish notation.
    pub body:     Vec<Token>,
    /// Source text of the statement, without the terminating `;`.
    pub source:   String,
    /// Position of the statement's first token.
    pub position: Position,
}

/// A `for` loop: `for (variable : iterable) { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// Name of the loop variable.
    pub variable: String,
    /// Expression producing the values to iterate over.
    pub iterable: Expression,
    /// Statements executed once per value.
    pub body:     Vec<Statement>,
    /// Source text of the whole loop.
    pub source:   String,
    /// Position of the `for` keyword.
    pub position: Position,
}

/// One statement of a parsed text.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A plain expression, possibly an assignment.
    Expression(Expression),
    /// A loop over the values of an iterable.
    ForLoop(ForLoop),
}

impl Statement {
    /// Source text of the statement.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Expression(expression) => &expression.source,
            Self::ForLoop(for_loop) => &for_loop.source,
        }
    }

    /// Position of the statement's first token.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Expression(expression) => expression.position,
            Self::ForLoop(for_loop) => for_loop.position,
        }
    }

    /// Returns the expression if this is not a loop.
    #[must_use]
    pub const fn as_expression(&self) -> Option<&Expression> {
        match self {
            Self::Expression(expression) => Some(expression),
            Self::ForLoop(_) => None,
        }
    }
}
