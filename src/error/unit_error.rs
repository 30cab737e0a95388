use thiserror::Error;

/// A unit string or conversion rule that could not be read.
///
/// Offsets are byte offsets into the unit string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// A character or token that has no place at this point of a unit.
    #[error("Unexpected input at {offset}: '{input}'.")]
    UnexpectedInput {
        /// The offending text.
        input:  String,
        /// Where it starts.
        offset: usize,
    },
    /// The unit ended where a symbol or exponent was expected.
    #[error("Unexpected end of unit.")]
    UnexpectedEnd,
    /// An exponent that does not fit into an `i32`.
    #[error("Invalid exponent: {exponent}.")]
    InvalidExponent {
        /// The exponent as written.
        exponent: String,
    },
    /// A symbol that is neither a known unit nor a prefixed known unit.
    #[error("Unknown unit: {symbol}.")]
    UnknownUnit {
        /// The symbol.
        symbol: String,
    },
    /// A conversion rule that does not follow the rule syntax.
    #[error("Invalid unit rule: {rule}")]
    InvalidRule {
        /// The rule text.
        rule: String,
    },
}
