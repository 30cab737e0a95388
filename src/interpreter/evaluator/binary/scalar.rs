use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            utils::number,
        },
        token::{Token, TokenType},
    },
};

impl Evaluator {
    /// Evaluates `+`, `-`, `*`, `/` and `%` on numbers.
    ///
    /// Two strings can be joined with `+`. Division and modulo by zero are
    /// errors rather than infinities. The result of `%` has the sign of the
    /// dividend.
    pub fn eval_scalar_op(operator: &str, left: &Token, right: &Token) -> EvalResult<Token> {
        if operator == "+"
           && left.kind() == TokenType::String
           && right.kind() == TokenType::String
        {
            let joined = format!("{}{}", left.as_str().unwrap_or_default(), right.as_str().unwrap_or_default());
            return Ok(Token::string(joined, left.position()));
        }

        let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
            let offending = if left.as_number().is_none() { left } else { right };
            return Err(EvaluationErrorKind::InvalidOperand { operator: operator.to_string(),
                                                             found:    offending.describe(), }.into());
        };

        let value = match operator {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" if b == 0.0 => return Err(EvaluationErrorKind::DivisionByZero.into()),
            "/" => a / b,
            "%" if b == 0.0 => return Err(EvaluationErrorKind::ModuloByZero.into()),
            _ => a % b,
        };

        Ok(number(value))
    }
}
