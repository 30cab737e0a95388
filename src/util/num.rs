use crate::error::EvaluationErrorKind;

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Converts a `u64` to `f64`, rounding to the nearest representable value
/// above `2^53`.
///
/// Counts and indices of huge ranges exceed the exactly representable
/// integers; for those the nearest float is the best available answer.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn u64_to_f64(value: u64) -> f64 {
    value as f64
}

/// Converts a `usize` to `f64`, see [`u64_to_f64`].
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Converts an `i64` to `f64`, see [`u64_to_f64`].
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Safely converts an `f64` to `i64` if the value is finite, within range,
/// and not fractional.
///
/// ## Errors
/// - `NonFiniteResult` for NaN and infinities.
/// - `NonIntegerValue` for fractional or out-of-range values.
///
/// ## Example
/// ```
/// use qformula::{error::EvaluationErrorKind, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(-12.0), Ok(-12));
/// assert!(matches!(f64_to_i64_checked(1.5), Err(EvaluationErrorKind::NonIntegerValue { .. })));
/// assert!(matches!(f64_to_i64_checked(f64::NAN), Err(EvaluationErrorKind::NonFiniteResult)));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64) -> Result<i64, EvaluationErrorKind> {
    if !value.is_finite() {
        return Err(EvaluationErrorKind::NonFiniteResult);
    }
    if value.fract() != 0.0 || value.abs() > MAX_SAFE_U64_INT as f64 {
        return Err(EvaluationErrorKind::NonIntegerValue { value: format_number(value) });
    }
    Ok(value as i64)
}

/// Safely converts an `f64` to `u64` if the value is finite, non-negative and
/// not fractional.
///
/// ## Errors
/// As [`f64_to_i64_checked`], plus `InvalidArgument` for negative values.
pub fn f64_to_u64_checked(value: f64) -> Result<u64, EvaluationErrorKind> {
    let integer = f64_to_i64_checked(value)?;
    u64::try_from(integer).map_err(|_| EvaluationErrorKind::InvalidArgument { details: format!("Expected a non-negative integer, found {}.",
                                                                                                 format_number(value)) })
}

/// Computes `n!`, saturating at `u64::MAX` instead of overflowing.
///
/// ## Example
/// ```
/// use qformula::util::num::saturating_factorial;
///
/// assert_eq!(saturating_factorial(0), 1);
/// assert_eq!(saturating_factorial(5), 120);
/// assert_eq!(saturating_factorial(21), u64::MAX);
/// ```
#[must_use]
pub fn saturating_factorial(n: u64) -> u64 {
    let mut result: u64 = 1;
    for i in 2..=n {
        match result.checked_mul(i) {
            Some(next) => result = next,
            None => return u64::MAX,
        }
    }
    result
}

/// Formats a number the way the language prints it.
///
/// Integral values below `1e15` are printed without a fractional part and
/// `-0` prints as `0`. Very large and very small magnitudes use exponent
/// notation.
///
/// ## Example
/// ```
/// use qformula::util::num::format_number;
///
/// assert_eq!(format_number(3.0), "3");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(0.25), "0.25");
/// assert_eq!(format_number(1e20), "1e20");
/// assert_eq!(format_number(1.5e-7), "1.5e-7");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    if !(1e-5..1e15).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}
