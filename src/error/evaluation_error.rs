use thiserror::Error;

use crate::interpreter::input_stream::Position;

/// A failure while executing a parsed statement.
///
/// Errors raised while running an RPN stream carry the position of the token
/// being executed. Errors raised outside of a token context (e.g. while
/// wrapping native values) have no position and display the bare message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    /// Where the failing token starts, if known.
    pub position: Option<Position>,
    /// What went wrong.
    pub kind:     EvaluationErrorKind,
}

impl EvaluationError {
    /// Attaches a position unless one is already set.
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }

    /// Returns the bare message without the position prefix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<EvaluationErrorKind> for EvaluationError {
    fn from(kind: EvaluationErrorKind) -> Self {
        Self { position: None,
               kind }
    }
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{position}:{}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvaluationError {}

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationErrorKind {
    /// Attempted division by zero.
    #[error("Division by zero is not defined.")]
    DivisionByZero,
    /// Attempted modulo by zero.
    #[error("Modulo by zero is not defined.")]
    ModuloByZero,
    /// Tried to use an undefined variable.
    #[error("Unknown variable: {name}.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
    },
    /// Called a function that is not part of the library.
    #[error("Unknown function: {name}.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
    },
    /// An algebraic variable was used where a concrete value is needed.
    #[error("Algebraic variable '{name}' cannot be used in this context.")]
    AlgebraicVariable {
        /// The name of the variable.
        name: String,
    },
    /// A random variable was read before it was instantiated.
    #[error("Random variable '{name}' has not been instantiated.")]
    UninstantiatedRandomVariable {
        /// The name of the variable.
        name: String,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Function {name}() expects {expected}, but received {found}.")]
    ArgumentCount {
        /// The function name.
        name:     String,
        /// Human readable description of the accepted arity.
        expected: String,
        /// Number of arguments actually supplied.
        found:    usize,
    },
    /// An argument was outside the function's domain.
    #[error("{details}")]
    InvalidArgument {
        /// Why the argument is invalid.
        details: String,
    },
    /// A number was expected.
    #[error("Number expected, found {found}.")]
    ExpectedNumber {
        /// Description of what was found instead.
        found: String,
    },
    /// A list was expected.
    #[error("List expected, found {found}.")]
    ExpectedList {
        /// Description of what was found instead.
        found: String,
    },
    /// An integer was expected but the number has a fractional part.
    #[error("Integer expected, found {value}.")]
    NonIntegerValue {
        /// The offending number.
        value: String,
    },
    /// A list or set with more than 1000 scalar elements.
    #[error("Lists with more than 1000 elements are not allowed.")]
    OversizedCollection,
    /// Indexing outside of the collection.
    #[error("Index out of range: {index}.")]
    IndexOutOfRange {
        /// The requested index.
        index: String,
    },
    /// An operation produced NaN or infinity.
    #[error("The result is not a finite number.")]
    NonFiniteResult,
    /// An operator was applied to operands it does not support.
    #[error("Operator '{operator}' cannot be applied to {found}.")]
    InvalidOperand {
        /// The operator.
        operator: String,
        /// Description of the operand.
        found:    String,
    },
    /// A range could not be built.
    #[error("{details}")]
    InvalidRange {
        /// Why the range is invalid.
        details: String,
    },
    /// A value could not be wrapped into the requested token type.
    #[error("Cannot wrap {found} into a {kind} token.")]
    InvalidWrap {
        /// Description of the value.
        found: String,
        /// Requested token type.
        kind:  String,
    },
    /// A token reached the evaluator without any rule to handle it.
    #[error("Unexpected token: {value}")]
    UnexpectedToken {
        /// The token's value.
        value: String,
    },
    /// The RPN stream left the operand stack in an inconsistent state.
    #[error("Invalid expression: the operand stack is corrupted.")]
    CorruptedStack,
}
