use crate::interpreter::{
    evaluator::function::core::FORMULA_FUNCTIONS,
    parser::{core::Parser, shunting_yard::NEGATION, statement::Statement},
    token::{Token, TokenType},
};

/// How much freedom an answer field grants, from a bare number up to a
/// formula with variables.
///
/// The discriminants are ordinals: a type accepts everything a lower type
/// accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnswerType {
    /// A single, optionally negated, number literal or named constant.
    Number = 0,
    /// Arithmetic on literals and constants.
    Numeric = 10,
    /// Arithmetic plus calls of the math and statistics functions.
    NumericalFormula = 100,
    /// Numerical formulas that also use variables.
    Algebraic = 1000,
}

impl std::fmt::Display for AnswerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Number => "NUMBER",
            Self::Numeric => "NUMERIC",
            Self::NumericalFormula => "NUMERICAL_FORMULA",
            Self::Algebraic => "ALGEBRAIC",
        };
        write!(f, "{name}")
    }
}

/// Operators allowed from `NUMERIC` upwards.
const ARITHMETIC_OPERATORS: &[&str] = &["+", "-", "*", "/", "^", "**", NEGATION];

/// Finds the lowest answer type that accepts the parsed text.
///
/// Only a single expression qualifies; several statements, loops and
/// assignments are never acceptable answers.
///
/// A dangling exponent marker is not part of a number: the lexer reads `1e`
/// as the number `1` followed by the identifier `e`, and implicit
/// multiplication turns that into `1·e`, which is `ALGEBRAIC`. Only complete
/// literals such as `1e-2` are a `NUMBER`.
///
/// # Example
/// ```
/// use qformula::{
///     answer::{AnswerType, classify_answer_type},
///     interpreter::parser::core::Parser,
/// };
///
/// let classify = |text| classify_answer_type(&Parser::new(text, &[]).unwrap());
///
/// assert_eq!(classify("-2.5"), Some(AnswerType::Number));
/// assert_eq!(classify("3+10^4"), Some(AnswerType::Numeric));
/// assert_eq!(classify("sin(3)-3+exp(4)"), Some(AnswerType::NumericalFormula));
/// assert_eq!(classify("a*b*c"), Some(AnswerType::Algebraic));
/// assert_eq!(classify("1e"), Some(AnswerType::Algebraic));
/// assert_eq!(classify("a = 3"), None);
/// ```
#[must_use]
pub fn classify_answer_type(parser: &Parser) -> Option<AnswerType> {
    match parser.statements() {
        [Statement::Expression(expression)] => classify_rpn(&expression.body),
        _ => None,
    }
}

/// Classifies one RPN sequence, see [`classify_answer_type`].
#[must_use]
pub fn classify_rpn(body: &[Token]) -> Option<AnswerType> {
    let value = match body {
        [value, negation] if negation.is_operator(NEGATION) => std::slice::from_ref(value),
        [_, _, negation] if negation.is_operator(NEGATION) => &body[..2],
        _ => body,
    };
    if is_single_number(value) {
        return Some(AnswerType::Number);
    }

    let mut required = AnswerType::Numeric;
    for token in body {
        let needed = match token.kind() {
            TokenType::Number | TokenType::Constant => AnswerType::Numeric,
            TokenType::Variable => AnswerType::Algebraic,
            TokenType::Operator if ARITHMETIC_OPERATORS.iter().any(|op| token.is_operator(op)) => AnswerType::Numeric,
            TokenType::Function if token.as_str() == Some("pi") => AnswerType::Numeric,
            TokenType::Function if token.as_str().is_some_and(|name| FORMULA_FUNCTIONS.contains(&name)) => {
                AnswerType::NumericalFormula
            },
            _ => return None,
        };
        required = required.max(needed);
    }

    Some(required)
}

fn is_single_number(body: &[Token]) -> bool {
    match body {
        [value] => matches!(value.kind(), TokenType::Number | TokenType::Constant),
        [count, function] => {
            count.as_number() == Some(0.0)
            && function.kind() == TokenType::Function
            && function.as_str() == Some("pi")
        },
        _ => false,
    }
}

/// Returns `true` if `text` parses and is acceptable for `answer_type`.
///
/// Names in `known_variables` are read as variables, so a whitelisted
/// identifier such as a unit name can follow a number.
///
/// # Example
/// ```
/// use qformula::answer::{AnswerType, is_acceptable_for_answertype};
///
/// assert!(is_acceptable_for_answertype("3 stdnormpdf", AnswerType::Algebraic, &["stdnormpdf"]));
/// assert!(!is_acceptable_for_answertype("3 stdnormpdf", AnswerType::Algebraic, &[]));
/// assert!(!is_acceptable_for_answertype("3+4", AnswerType::Number, &[]));
/// ```
#[must_use]
pub fn is_acceptable_for_answertype(text: &str, answer_type: AnswerType, known_variables: &[&str]) -> bool {
    Parser::new(text, known_variables).ok()
                                      .and_then(|parser| classify_answer_type(&parser))
                                      .is_some_and(|required| required <= answer_type)
}

/// Splits an answer like `1000 g m/s` into its numeric part and its unit.
///
/// The numeric part is the longest prefix that is a numerical formula; the
/// rest, trimmed, is the unit. Without any numeric prefix the whole text is
/// the unit.
///
/// # Example
/// ```
/// use qformula::answer::split_number_and_unit;
///
/// assert_eq!(split_number_and_unit("1000 g m/s"), ("1000".to_string(), "g m/s".to_string()));
/// assert_eq!(split_number_and_unit("2.5e3"), ("2.5e3".to_string(), String::new()));
/// assert_eq!(split_number_and_unit("kg"), (String::new(), "kg".to_string()));
/// ```
#[must_use]
pub fn split_number_and_unit(text: &str) -> (String, String) {
    let boundaries = text.char_indices()
                         .map(|(i, _)| i)
                         .skip(1)
                         .chain(std::iter::once(text.len()))
                         .collect::<Vec<_>>();

    for &end in boundaries.iter().rev() {
        let (number, unit) = text.split_at(end);
        if number.trim().is_empty() {
            break;
        }
        if is_acceptable_for_answertype(number, AnswerType::NumericalFormula, &[]) {
            return (number.trim().to_string(), unit.trim().to_string());
        }
    }

    (String::new(), text.trim().to_string())
}
