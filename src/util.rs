/// Numeric conversion and formatting helpers.
///
/// This module provides checked conversions between floating-point values and
/// integers, so that indices, counts and combinatorial arguments never lose
/// information silently, together with the canonical number formatting used
/// when values are printed or serialized back into source text.
///
/// Fallible helpers return a `Result` carrying an evaluation error kind that
/// callers attach a position to.
pub mod num;
