use crate::{
    interpreter::{
        evaluator::{
            core::EvalResult,
            utils::{expect_integer, invalid_argument, number},
        },
        token::Token,
    },
    util::num::i64_to_f64,
};

/// Largest `n` whose factorial is finite as an `f64`.
const MAX_FACTORIAL: i64 = 170;

fn non_negative(token: &Token, function: &str) -> EvalResult<i64> {
    let n = expect_integer(token)?;
    if n < 0 {
        return Err(invalid_argument(format!("{function}() is only defined for non-negative integers.")));
    }
    Ok(n)
}

/// Factorial of a non-negative integer up to 170.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::combinatorics::fact,
///     input_stream::Position,
///     token::Token,
/// };
///
/// assert_eq!(fact(&[Token::number(5.0, Position::default())]).unwrap().as_number(), Some(120.0));
/// ```
pub fn fact(args: &[Token]) -> EvalResult<Token> {
    let n = non_negative(&args[0], "fact")?;
    if n > MAX_FACTORIAL {
        return Err(invalid_argument(format!("fact() is limited to arguments up to {MAX_FACTORIAL}.")));
    }
    Ok(number((2..=n).map(i64_to_f64).product()))
}

/// Binomial coefficient `n choose k`; zero when `k > n`.
pub fn ncr(args: &[Token]) -> EvalResult<Token> {
    let n = non_negative(&args[0], "ncr")?;
    let k = non_negative(&args[1], "ncr")?;
    if k > n {
        return Ok(number(0.0));
    }

    let k = k.min(n - k);
    let value = (1..=k).fold(1.0, |acc, i| acc * i64_to_f64(n - k + i) / i64_to_f64(i));
    Ok(number(value.round()))
}

/// Number of ordered selections of `k` out of `n`; zero when `k > n`.
pub fn npr(args: &[Token]) -> EvalResult<Token> {
    let n = non_negative(&args[0], "npr")?;
    let k = non_negative(&args[1], "npr")?;
    if k > n {
        return Ok(number(0.0));
    }
    Ok(number((n - k + 1..=n).map(i64_to_f64).product()))
}

fn euclid(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    i64::try_from(a).unwrap_or(i64::MAX)
}

/// Greatest common divisor; `gcd(0, 0)` is `0`.
pub fn gcd(args: &[Token]) -> EvalResult<Token> {
    let a = expect_integer(&args[0])?;
    let b = expect_integer(&args[1])?;
    Ok(number(i64_to_f64(euclid(a, b))))
}

/// Least common multiple; zero if either argument is zero.
pub fn lcm(args: &[Token]) -> EvalResult<Token> {
    let a = expect_integer(&args[0])?;
    let b = expect_integer(&args[1])?;
    if a == 0 || b == 0 {
        return Ok(number(0.0));
    }
    let divisor = euclid(a, b);
    Ok(number((i64_to_f64(a) / i64_to_f64(divisor) * i64_to_f64(b)).abs()))
}
