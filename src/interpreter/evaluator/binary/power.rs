use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            utils::{expect_number, number},
        },
        token::Token,
    },
};

impl Evaluator {
    /// Evaluates an exponentiation `base ^ exponent`.
    ///
    /// `0` raised to a negative power is a division by zero. A negative base
    /// with a fractional exponent has no real result.
    pub fn eval_pow(base: &Token, exponent: &Token) -> EvalResult<Token> {
        let b = expect_number(base)?;
        let e = expect_number(exponent)?;

        if b == 0.0 && e < 0.0 {
            return Err(EvaluationErrorKind::DivisionByZero.into());
        }

        let result = if e.fract() == 0.0 && e.abs() <= f64::from(i32::MAX) {
            #[allow(clippy::cast_possible_truncation)]
            b.powi(e as i32)
        } else {
            b.powf(e)
        };

        if result.is_nan() {
            return Err(EvaluationErrorKind::NonFiniteResult.into());
        }
        Ok(number(result))
    }
}
