//! # qformula
//!
//! qformula is an expression engine for checking and grading mathematical
//! answers. It parses formula text into reverse polish notation, classifies
//! how free an answer is, evaluates statements against layered variable
//! scopes with random and algebraic variables, converts physical units and
//! renders formulas as LaTeX.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        parser::core::{ParseResult, Parser},
        token::Token,
    },
    units::{
        conversion::{Convertibility, UnitConversionRules},
        unit::Unit,
    },
};

pub use crate::{
    answer::{AnswerType, classify_answer_type, split_number_and_unit},
    latex::{latexify, latexify_unit},
};

/// Answer types and answer validation.
///
/// This module ranks parsed answers from a bare number up to a formula with
/// free variables, and uses that ranking to accept or reject input and to
/// separate a numeric value from its unit.
///
/// # Responsibilities
/// - Classifies a parsed expression as `NUMBER`, `NUMERIC`,
///   `NUMERICAL_FORMULA` or `ALGEBRAIC`.
/// - Checks whether a text is acceptable for a required answer type.
/// - Splits `"9.81 m/s^2"` into its number and unit parts.
pub mod answer;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// evaluating or reading units. Syntax and evaluation errors carry the
/// position of the failure and print as `row:column:message`.
///
/// # Responsibilities
/// - Defines one error enum per phase (syntax, evaluation, units).
/// - Attaches source positions for user feedback.
/// - Integrates with the standard error traits through `thiserror`.
pub mod error;
/// Orchestrates the entire process of formula evaluation.
///
/// This module ties together the input stream, lexing, parsing, evaluation
/// and the value types.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating formula text.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// LaTeX rendering of parsed formulas and units.
pub mod latex;
/// Physical units.
///
/// Parsing of unit strings such as `kg m/s^2` into normalized units, and the
/// SI based rule table that decides whether two units are convertible and by
/// which factor.
pub mod units;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides conversions between integer and floating-point types
/// that never lose data silently, and the number formatting shared by the
/// evaluator, the serializer of random variables and the LaTeX renderer.
///
/// # Responsibilities
/// - Safely convert between `i64`, `u64`, `usize`, and `f64`.
/// - Format numbers the way they are written back into source text.
pub mod util;

/// Parses formula text into statements.
///
/// Names listed in `known_variables` are always read as variables, even if
/// they collide with a builtin function.
///
/// # Errors
/// The first lexical or syntax error, positioned in `text`.
///
/// # Examples
/// ```
/// use qformula::parse;
///
/// assert!(parse("3 + 10^4", &[]).is_ok());
///
/// let error = parse("(1 + 2", &[]).unwrap_err();
/// assert_eq!(error.to_string(), "1:0:Unbalanced parenthesis, '(' is never closed.");
/// ```
pub fn parse(text: &str, known_variables: &[&str]) -> ParseResult<Parser> {
    Parser::new(text, known_variables)
}

/// Evaluates parsed statements in the given evaluator and returns the value
/// of the last expression statement.
///
/// Assignments made before a failing statement stay in the evaluator's
/// scope.
///
/// # Errors
/// The first evaluation error.
///
/// # Examples
/// ```
/// use qformula::{evaluate, interpreter::evaluator::core::Evaluator, parse};
///
/// let mut evaluator = Evaluator::new();
/// let parsed = parse("x = 4; sqrt(x) + 1", &[]).unwrap();
///
/// let value = evaluate(&parsed, &mut evaluator).unwrap();
/// assert_eq!(value.and_then(|v| v.as_number()), Some(3.0));
/// ```
pub fn evaluate(parsed: &Parser, evaluator: &mut Evaluator) -> EvalResult<Option<Token>> {
    Ok(evaluator.evaluate(parsed.statements())?.pop())
}

/// Parses a unit string into a normalized unit.
///
/// The empty string is the valid dimensionless unit. Anything outside the
/// unit grammar yields `None`.
///
/// # Examples
/// ```
/// use qformula::parse_unit;
///
/// assert!(parse_unit("kg m/s").is_some());
/// assert!(parse_unit("").is_some_and(|unit| unit.is_empty()));
/// assert!(parse_unit("m*s").is_none());
/// ```
#[must_use]
pub fn parse_unit(text: &str) -> Option<Unit> {
    units::parser::parse(text).ok()
}

/// Checks whether `from` can be converted to `to` with the built-in SI rule
/// table. One `from` equals `cfactor` of `to`.
///
/// # Examples
/// ```
/// use qformula::{check_convertibility, parse_unit};
///
/// let kg = parse_unit("kg m/s").unwrap();
/// let g = parse_unit("g m/s").unwrap();
///
/// let result = check_convertibility(&kg, &g);
/// assert!(result.convertible);
/// assert!((result.cfactor - 1000.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn check_convertibility(from: &Unit, to: &Unit) -> Convertibility {
    UnitConversionRules::new().check_convertibility(from, to)
}
