use crate::{
    interpreter::{
        evaluator::{
            core::EvalResult,
            utils::{expect_number, invalid_argument, number},
        },
        token::Token,
    },
};

fn positive(args: &[Token]) -> EvalResult<f64> {
    let x = expect_number(&args[0])?;
    if x <= 0.0 {
        return Err(invalid_argument("The logarithm is only defined for positive numbers."));
    }
    Ok(x)
}

/// Natural logarithm.
pub fn ln(args: &[Token]) -> EvalResult<Token> {
    Ok(number(positive(args)?.ln()))
}

/// Logarithm to a fixed base, used for `log10`, `lg`, `lb` and `log2`.
pub fn log_base(args: &[Token], base: f64) -> EvalResult<Token> {
    Ok(number(positive(args)?.log(base)))
}

/// `log(x)` is the natural logarithm, `log(x, base)` the logarithm to an
/// arbitrary base.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::log::log,
///     input_stream::Position,
///     token::Token,
/// };
///
/// let x = Token::number(8.0, Position::default());
/// let base = Token::number(2.0, Position::default());
/// assert!((log(&[x, base]).unwrap().as_number().unwrap() - 3.0).abs() < 1e-12);
/// ```
pub fn log(args: &[Token]) -> EvalResult<Token> {
    let x = positive(args)?;
    let Some(base) = args.get(1) else {
        return Ok(number(x.ln()));
    };

    let base = expect_number(base)?;
    if base <= 0.0 || base == 1.0 {
        return Err(invalid_argument("The base of a logarithm must be positive and different from 1."));
    }
    Ok(number(x.ln() / base.ln()))
}
