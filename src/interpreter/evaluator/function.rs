/// Function table and dispatch.
///
/// Declares every builtin with its arity and routes calls to the
/// implementations below.
pub mod core;

/// Elementary math: trigonometry, rounding and friends.
pub mod builtin;

/// Logarithms.
pub mod log;

/// Factorials, binomial coefficients and integer divisibility.
pub mod combinatorics;

/// Normal distribution functions.
pub mod stats;

/// Functions on lists, sets and strings.
pub mod list;
