/// Character level access to the source text.
///
/// Defines `InputStream`, which hands out characters one at a time while
/// tracking the row and column of each, and `Position`, the location type
/// used by every error.
pub mod input_stream;
/// The lexer module tokenizes formula text.
///
/// The lexer reads the raw text and produces a stream of tokens: numbers,
/// strings, identifiers, operators, delimiters and reserved words, each with
/// the position of its first character.
///
/// # Responsibilities
/// - Converts the input character stream into positioned tokens.
/// - Handles numeric literals in decimal and scientific notation, quoted
///   strings with escapes and `#` comments.
/// - Reports lexical errors for invalid input at the offending character.
pub mod lexer;
/// Tokens and runtime values.
///
/// A `Token` is both the unit the parser works with and the value the
/// evaluator computes, so RPN sequences and their results share one type.
pub mod token;
/// The value module defines the composite runtime data types.
///
/// Ranges and lazy element lists back set literals without ever expanding
/// them; variables and random variables are what the scopes hold.
pub mod value;
/// The parser module turns tokens into statements of RPN.
///
/// # Responsibilities
/// - Splits the token stream into statements and `for` loops.
/// - Checks delimiter balance and resolves identifiers into variables,
///   functions and constants.
/// - Converts each expression from infix to RPN with the shunting-yard
///   algorithm.
pub mod parser;
/// The evaluator module executes RPN statements and computes results.
///
/// # Responsibilities
/// - Runs RPN on an operand stack against a layered variable scope.
/// - Implements operators and the builtin function library.
/// - Manages random variables and algebraic variables.
/// - Reports evaluation errors such as division by zero or unknown
///   variables.
pub mod evaluator;
