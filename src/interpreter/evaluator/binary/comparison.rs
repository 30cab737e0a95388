use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            utils::boolean,
        },
        token::{Token, TokenType},
    },
};

impl Evaluator {
    /// Evaluates a comparison, returning `1` when it holds and `0` otherwise.
    ///
    /// Numbers compare numerically and strings lexicographically. `==` and
    /// `!=` also accept lists and values of different types, which are never
    /// equal.
    pub fn eval_comparison(operator: &str, left: &Token, right: &Token) -> EvalResult<Token> {
        if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
            return Ok(boolean(match operator {
                                  "<" => a < b,
                                  ">" => a > b,
                                  "<=" => a <= b,
                                  ">=" => a >= b,
                                  "==" => a == b,
                                  _ => a != b,
                              }));
        }

        if left.kind() == TokenType::String && right.kind() == TokenType::String {
            let (a, b) = (left.as_str().unwrap_or_default(), right.as_str().unwrap_or_default());
            return Ok(boolean(match operator {
                                  "<" => a < b,
                                  ">" => a > b,
                                  "<=" => a <= b,
                                  ">=" => a >= b,
                                  "==" => a == b,
                                  _ => a != b,
                              }));
        }

        match operator {
            "==" => Ok(boolean(left.kind() == right.kind() && left.value() == right.value())),
            "!=" => Ok(boolean(left.kind() != right.kind() || left.value() != right.value())),
            _ => Err(EvaluationErrorKind::InvalidOperand { operator: operator.to_string(),
                                                           found:    format!("{} and {}", left.describe(), right.describe()), }.into()),
        }
    }
}
