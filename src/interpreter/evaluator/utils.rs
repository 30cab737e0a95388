use crate::{
    error::{EvaluationError, EvaluationErrorKind},
    interpreter::{
        evaluator::core::EvalResult,
        input_stream::Position,
        token::{Token, TokenType, TokenValue},
    },
    util::num::f64_to_i64_checked,
};

/// Wraps a computed number into a token.
#[must_use]
pub fn number(value: f64) -> Token {
    Token::number(value, Position::default())
}

/// Wraps a truth value into `1` or `0`.
#[must_use]
pub fn boolean(value: bool) -> Token {
    number(if value { 1.0 } else { 0.0 })
}

/// Extracts a number from a resolved value.
///
/// # Errors
/// `ExpectedNumber` for anything but a number.
pub fn expect_number(token: &Token) -> EvalResult<f64> {
    token.as_number()
         .ok_or_else(|| EvaluationErrorKind::ExpectedNumber { found: token.describe() }.into())
}

/// Extracts an integer from a resolved value.
///
/// # Errors
/// `ExpectedNumber` for non-numbers and `NonIntegerValue` for numbers with a
/// fractional part.
pub fn expect_integer(token: &Token) -> EvalResult<i64> {
    Ok(f64_to_i64_checked(expect_number(token)?)?)
}

/// Extracts the elements of a list.
///
/// # Errors
/// `ExpectedList` for anything but a list.
pub fn expect_list(token: &Token) -> EvalResult<&[Token]> {
    match token.value() {
        TokenValue::List(elements) if token.kind() == TokenType::List => Ok(elements),
        _ => Err(EvaluationErrorKind::ExpectedList { found: token.describe() }.into()),
    }
}

/// Interprets a value as a condition: every number but `0` is true.
///
/// # Errors
/// `ExpectedNumber` for non-numbers.
pub fn is_truthy(token: &Token) -> EvalResult<bool> {
    Ok(expect_number(token)? != 0.0)
}

/// Fails with `NonFiniteResult` if the value is a number that is NaN or
/// infinite.
pub fn check_finite(token: Token) -> EvalResult<Token> {
    match token.as_number() {
        Some(n) if !n.is_finite() => Err(EvaluationErrorKind::NonFiniteResult.into()),
        _ => Ok(token),
    }
}

/// Builds an `InvalidArgument` error.
pub fn invalid_argument(details: impl Into<String>) -> EvaluationError {
    EvaluationErrorKind::InvalidArgument { details: details.into() }.into()
}

/// Resolves a possibly negative index against a collection length. Negative
/// indices count from the end.
///
/// # Errors
/// `IndexOutOfRange` if the index lies outside the collection.
pub fn resolve_index(index: i64, len: u64) -> EvalResult<u64> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index.unsigned_abs()).filter(|i| *i < len)
    };

    resolved.ok_or_else(|| EvaluationErrorKind::IndexOutOfRange { index: index.to_string() }.into())
}
