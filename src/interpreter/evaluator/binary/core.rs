use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        token::Token,
    },
};

impl Evaluator {
    /// Evaluates a binary operation between two resolved values.
    ///
    /// The operator selects the handler: arithmetic and string concatenation,
    /// exponentiation, comparison or logic. Comparisons and logical operators
    /// yield `1` or `0`.
    ///
    /// # Example
    /// ```
    /// use qformula::interpreter::{
    ///     evaluator::core::Evaluator,
    ///     input_stream::Position,
    ///     token::Token,
    /// };
    ///
    /// let three = Token::number(3.0, Position::default());
    /// let four = Token::number(4.0, Position::default());
    ///
    /// assert_eq!(Evaluator::eval_binary("+", &three, &four).unwrap().as_number(), Some(7.0));
    /// assert_eq!(Evaluator::eval_binary("<", &three, &four).unwrap().as_number(), Some(1.0));
    /// ```
    pub fn eval_binary(operator: &str, left: &Token, right: &Token) -> EvalResult<Token> {
        match operator {
            "+" | "-" | "*" | "/" | "%" => Self::eval_scalar_op(operator, left, right),
            "^" | "**" => Self::eval_pow(left, right),
            "<" | ">" | "<=" | ">=" | "==" | "!=" => Self::eval_comparison(operator, left, right),
            "&&" | "||" | "&" | "|" | "<<" | ">>" => Self::eval_logic(operator, left, right),
            _ => Err(EvaluationErrorKind::UnexpectedToken { value: operator.to_string() }.into()),
        }
    }
}
