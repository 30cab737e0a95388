use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            utils::{boolean, expect_integer, is_truthy, number},
        },
        token::Token,
    },
    util::num::i64_to_f64,
};

impl Evaluator {
    /// Evaluates logical (`&&`, `||`) and bitwise (`&`, `|`, `<<`, `>>`)
    /// operators.
    ///
    /// Logical operators treat every non-zero number as true and return `1`
    /// or `0`. Bitwise operators require integers; shift distances must lie
    /// in `0..64`.
    pub fn eval_logic(operator: &str, left: &Token, right: &Token) -> EvalResult<Token> {
        match operator {
            "&&" => Ok(boolean(is_truthy(left)? && is_truthy(right)?)),
            "||" => Ok(boolean(is_truthy(left)? || is_truthy(right)?)),
            _ => {
                let a = expect_integer(left)?;
                let b = expect_integer(right)?;

                let value = match operator {
                    "&" => a & b,
                    "|" => a | b,
                    _ => {
                        let shift = u32::try_from(b).ok()
                                                    .filter(|s| *s < 64)
                                                    .ok_or_else(|| EvaluationErrorKind::InvalidArgument { details: format!("Invalid shift distance: {b}.") })?;
                        if operator == "<<" { a.wrapping_shl(shift) } else { a >> shift }
                    },
                };
                Ok(number(i64_to_f64(value)))
            },
        }
    }
}
