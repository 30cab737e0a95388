use thiserror::Error;

use crate::interpreter::input_stream::Position;

/// A lexing or parsing failure, tagged with the position of the construct
/// that caused it.
///
/// The `Display` output is `row:column:message`, e.g.
/// `1:4:Unexpected input: '$'`. Collaborators match on the message suffix, so
/// the messages must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}:{kind}")]
pub struct SyntaxError {
    /// Where the offending construct starts.
    pub position: Position,
    /// What went wrong.
    pub kind:     SyntaxErrorKind,
}

impl SyntaxError {
    /// Creates a new syntax error at the given position.
    #[must_use]
    pub const fn new(kind: SyntaxErrorKind, position: Position) -> Self {
        Self { position, kind }
    }

    /// Returns the bare message without the position prefix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A character that does not start any token.
    #[error("Unexpected input: '{input}'")]
    UnexpectedInput {
        /// The offending character.
        input: char,
    },
    /// End of input was reached inside a string literal.
    #[error("Unterminated string, started at row {row}, column {column}.")]
    UnterminatedString {
        /// Row of the opening quote.
        row:    usize,
        /// Column of the opening quote.
        column: usize,
    },
    /// A delimiter was closed by a delimiter of a different kind.
    #[error("Mismatched parentheses, '{opening}' is closed by '{closing}'.")]
    MismatchedParentheses {
        /// The opening delimiter.
        opening: char,
        /// The closing delimiter that does not match.
        closing: char,
    },
    /// A delimiter was opened but never closed.
    #[error("Unbalanced parenthesis, '{opening}' is never closed.")]
    UnclosedParenthesis {
        /// The opening delimiter.
        opening: char,
    },
    /// A closing delimiter without a matching opening one.
    #[error("Unbalanced parenthesis, stray '{closing}' found.")]
    StrayParenthesis {
        /// The closing delimiter.
        closing: char,
    },
    /// A token reached the RPN conversion without any rule to handle it.
    #[error("Unexpected token: {value}")]
    UnexpectedToken {
        /// The token's value.
        value: String,
    },
    /// A builtin function name was used without an argument list.
    #[error("Function '{name}' must be called with parentheses.")]
    FunctionWithoutParentheses {
        /// The function name.
        name: String,
    },
    /// The `\` prefix was not followed by a function call.
    #[error("Syntax error: the prefix '\\' must be followed by a function call.")]
    InvalidPrefix,
    /// Function name used after `\` is not a known function.
    #[error("Unknown function: '{name}'.")]
    UnknownFunction {
        /// The function name.
        name: String,
    },
    /// An operator lacks one of its operands.
    #[error("Syntax error: missing operand for '{operator}'.")]
    MissingOperand {
        /// The operator.
        operator: String,
    },
    /// Two operands follow each other without an operator in between.
    #[error("Syntax error: missing operator before '{value}'.")]
    MissingOperator {
        /// The operand that follows without an operator.
        value: String,
    },
    /// The left-hand side of `=` is not a plain variable.
    #[error("Left-hand side of assignment must be a variable.")]
    InvalidAssignment,
    /// Tried to assign to a constant or a builtin function.
    #[error("Cannot assign to the constant or function '{name}'.")]
    AssignmentToReserved {
        /// The protected name.
        name: String,
    },
    /// A separator appeared where none is allowed.
    #[error("Syntax error: unexpected '{separator}'.")]
    UnexpectedSeparator {
        /// The separator character.
        separator: char,
    },
    /// A pair of delimiters without content where content is required.
    #[error("Syntax error: empty expression.")]
    EmptyExpression,
    /// A range does not have two or three parts.
    #[error("Syntax error: a range needs a start and an end, plus an optional step.")]
    InvalidRange,
    /// A `:` of a ternary operator without preceding `?`.
    #[error("Syntax error: ':' without preceding '?'.")]
    ColonWithoutQuestion,
    /// A `?` of a ternary operator without matching `:`.
    #[error("Syntax error: '?' without matching ':'.")]
    QuestionWithoutColon,
    /// A malformed `for` loop header or body.
    #[error("Syntax error in for loop: {details}")]
    InvalidForLoop {
        /// What is wrong with the loop.
        details: String,
    },
}
