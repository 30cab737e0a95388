/// Tokens of the unit grammar.
///
/// A `logos` lexer over unit symbols, integers, `^`, `/`, parentheses and
/// the operators the grammar rejects.
pub mod lexer;
/// The unit grammar.
///
/// Recursive descent over the unit tokens, producing a normalized unit.
pub mod parser;
/// Normalized units.
pub mod unit;
/// Unit conversion.
///
/// The rule table of units, SI prefixes and derived units, and the
/// convertibility check between two units.
pub mod conversion;
