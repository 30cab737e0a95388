use std::f64::consts::{PI, SQRT_2};

use crate::interpreter::{
    evaluator::{
        core::EvalResult,
        utils::{expect_number, invalid_argument, number},
    },
    token::Token,
};

/// Complementary error function, Chebyshev fit with a relative error below
/// `1.2e-7` everywhere.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / 0.5f64.mul_add(z, 1.0);
    let poly = [-1.265_512_23,
                1.000_023_68,
                0.374_091_96,
                0.096_784_18,
                -0.186_288_06,
                0.278_868_07,
                -1.135_203_98,
                1.488_515_87,
                -0.822_152_23,
                0.170_872_77].iter()
                             .rev()
                             .fold(0.0_f64, |acc, c| acc.mul_add(t, *c));
    let ans = t * (-z).mul_add(z, poly).exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

fn std_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Density of the standard normal distribution.
pub fn stdnormpdf(args: &[Token]) -> EvalResult<Token> {
    let x = expect_number(&args[0])?;
    Ok(number((-0.5 * x * x).exp() / (2.0 * PI).sqrt()))
}

/// Cumulative distribution function of the standard normal distribution.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::stats::stdnormcdf,
///     input_stream::Position,
///     token::Token,
/// };
///
/// let p = stdnormcdf(&[Token::number(1.96, Position::default())]).unwrap();
/// assert!((p.as_number().unwrap() - 0.975).abs() < 1e-4);
/// ```
pub fn stdnormcdf(args: &[Token]) -> EvalResult<Token> {
    Ok(number(std_normal_cdf(expect_number(&args[0])?)))
}

/// `normcdf(x, mu, sigma)`: cumulative distribution function of a normal
/// distribution with mean `mu` and standard deviation `sigma > 0`.
pub fn normcdf(args: &[Token]) -> EvalResult<Token> {
    let x = expect_number(&args[0])?;
    let mu = expect_number(&args[1])?;
    let sigma = expect_number(&args[2])?;
    if sigma <= 0.0 {
        return Err(invalid_argument("The standard deviation must be positive."));
    }
    Ok(number(std_normal_cdf((x - mu) / sigma)))
}
