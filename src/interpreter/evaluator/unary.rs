use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            utils::{boolean, expect_integer, expect_number, number},
        },
        parser::shunting_yard::NEGATION,
        token::Token,
    },
    util::num::i64_to_f64,
};

impl Evaluator {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `_`: numeric negation.
    /// - `!`: logical not, `1` for zero and `0` for everything else.
    /// - `~`: bitwise complement of an integer.
    ///
    /// # Example
    /// ```
    /// use qformula::interpreter::{
    ///     evaluator::core::Evaluator,
    ///     input_stream::Position,
    ///     token::Token,
    /// };
    ///
    /// let five = Token::number(5.0, Position::default());
    /// assert_eq!(Evaluator::eval_unary("_", &five).unwrap().as_number(), Some(-5.0));
    /// assert_eq!(Evaluator::eval_unary("!", &five).unwrap().as_number(), Some(0.0));
    /// assert_eq!(Evaluator::eval_unary("~", &five).unwrap().as_number(), Some(-6.0));
    /// ```
    pub fn eval_unary(operator: &str, operand: &Token) -> EvalResult<Token> {
        match operator {
            NEGATION => Ok(number(-expect_number(operand)?)),
            "!" => Ok(boolean(expect_number(operand)? == 0.0)),
            "~" => {
                let value = expect_integer(operand)?;
                Ok(number(i64_to_f64(!value)))
            },
            _ => Err(EvaluationErrorKind::InvalidOperand { operator: operator.to_string(),
                                                           found:    operand.describe(), }.into()),
        }
    }
}
