/// Parser entry point.
///
/// Declares the `Parser` type that splits a text into statements and the
/// `ParseResult` alias shared by the lexer and the parser.
pub mod core;

/// Parsed statements.
///
/// Defines expression statements, `for` loops and the enum wrapping both.
pub mod statement;

/// Infix to RPN conversion.
///
/// Implements the operator-precedence conversion, including unary
/// operators, function calls, the ternary operator, indexing and set, list
/// and range literals, plus a validation pass over the produced RPN.
pub mod shunting_yard;

/// Parser helpers.
///
/// Delimiter balance checking, identifier classification, implicit
/// multiplication and source text slicing.
pub mod utils;
