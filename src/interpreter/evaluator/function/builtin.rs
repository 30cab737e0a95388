use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::EvalResult,
            utils::{expect_integer, expect_number, number},
        },
        token::Token,
    },
};

/// Applies a unary real function to a numeric argument.
///
/// The generated functions accept exactly one numeric argument. Results
/// outside the function's domain come out as NaN and are rejected by the
/// evaluator as non-finite.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::builtin::sin,
///     input_stream::Position,
///     token::Token,
/// };
///
/// let x = Token::number(std::f64::consts::PI / 2.0, Position::default());
/// assert_eq!(sin(&[x]).unwrap().as_number(), Some(1.0));
/// ```
macro_rules! real_builtin {
    ($($fname:ident),* $(,)?) => {
        $(
            pub fn $fname(args: &[Token]) -> EvalResult<Token> {
                Ok(number(expect_number(&args[0])?.$fname()))
            }
        )*
    };
}

real_builtin!(sin, cos, tan, asin, acos, atan, sinh, cosh, tanh, asinh, acosh, atanh, exp, abs, ceil, floor);

/// Square root of a non-negative number.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::builtin::sqrt,
///     input_stream::Position,
///     token::Token,
/// };
///
/// assert_eq!(sqrt(&[Token::number(16.0, Position::default())]).unwrap().as_number(), Some(4.0));
/// assert!(sqrt(&[Token::number(-1.0, Position::default())]).is_err());
/// ```
pub fn sqrt(args: &[Token]) -> EvalResult<Token> {
    let x = expect_number(&args[0])?;
    if x < 0.0 {
        return Err(EvaluationErrorKind::InvalidArgument { details: "The square root of a negative number is not defined.".to_string() }.into());
    }
    Ok(number(x.sqrt()))
}

/// Returns `-1`, `0` or `1`. Unlike `f64::signum`, zero maps to `0`.
pub fn sign(args: &[Token]) -> EvalResult<Token> {
    let x = expect_number(&args[0])?;
    Ok(number(if x == 0.0 { 0.0 } else { x.signum() }))
}

/// Rounds half away from zero, optionally to a number of decimal digits.
/// Negative digit counts round to tens, hundreds and so on.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::builtin::round,
///     input_stream::Position,
///     token::Token,
/// };
///
/// let x = Token::number(3.14159, Position::default());
/// let digits = Token::number(2.0, Position::default());
/// assert_eq!(round(&[x, digits]).unwrap().as_number(), Some(3.14));
/// ```
pub fn round(args: &[Token]) -> EvalResult<Token> {
    let x = expect_number(&args[0])?;
    let Some(digits) = args.get(1) else {
        return Ok(number(x.round()));
    };

    let digits = i32::try_from(expect_integer(digits)?).ok()
                                                       .filter(|d| d.abs() <= 15)
                                                       .ok_or_else(|| EvaluationErrorKind::InvalidArgument { details: "round() supports at most 15 digits.".to_string() })?;
    let factor = 10f64.powi(digits);
    Ok(number((x * factor).round() / factor))
}

/// Angle of the point `(x, y)`, called as `atan2(y, x)`.
pub fn atan2(args: &[Token]) -> EvalResult<Token> {
    let y = expect_number(&args[0])?;
    let x = expect_number(&args[1])?;
    Ok(number(y.atan2(x)))
}

/// Floating point remainder with the sign of the dividend.
pub fn fmod(args: &[Token]) -> EvalResult<Token> {
    let a = expect_number(&args[0])?;
    let b = expect_number(&args[1])?;
    if b == 0.0 {
        return Err(EvaluationErrorKind::ModuloByZero.into());
    }
    Ok(number(a % b))
}

/// The constant π, for the call form `pi()`.
pub fn pi(_args: &[Token]) -> EvalResult<Token> {
    Ok(number(std::f64::consts::PI))
}
