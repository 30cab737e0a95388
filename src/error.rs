/// Syntax errors.
///
/// Defines all error types that can occur while reading, lexing and parsing
/// source text. Every syntax error carries the position in the input where
/// the offending construct starts.
pub mod syntax_error;
/// Evaluation errors.
///
/// Contains all error types that can be raised while executing parsed
/// statements: unknown variables, division by zero, misuse of algebraic
/// variables, bad function arguments and oversized collections.
pub mod evaluation_error;
/// Unit errors.
///
/// Failures of the unit grammar and of unit conversion rules. Callers of
/// the convenience API only see these as a missing unit.
pub mod unit_error;

pub use evaluation_error::{EvaluationError, EvaluationErrorKind};
pub use syntax_error::{SyntaxError, SyntaxErrorKind};
pub use unit_error::UnitError;
use thiserror::Error;

/// Any error the engine can report for a complete parse-and-evaluate run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Lexing or parsing failed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// Evaluation of a parsed statement failed.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
