/// Dispatch of binary operators.
///
/// Routes each operator to the handler for its family.
pub mod core;

/// Arithmetic on numbers and string concatenation.
pub mod scalar;

/// Exponentiation.
pub mod power;

/// Comparison operators, which yield `1` or `0`.
pub mod comparison;

/// Logical and bitwise operators.
pub mod logic;
