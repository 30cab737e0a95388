/// Core evaluation logic and scope management.
///
/// Contains the RPN stack machine, the layered variable scope and the
/// resolution of variables and constants.
pub mod core;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, exponentiation, comparisons and logical and bitwise
/// operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, logical not and bitwise complement.
pub mod unary;

/// Construction and indexing of ranges, sets and lists.
pub mod collection;

/// Function evaluation.
///
/// Holds the builtin function table, arity checking and the function
/// implementations.
pub mod function;

/// Random variables: permutations, instantiation and export of datasets.
pub mod random;

/// Comparison of formulas by sampling their algebraic variables.
pub mod algebraic;

/// Evaluation of `for` loops.
pub mod for_loop;

/// Utility functions for evaluation.
///
/// Provides helpers for extracting typed values from tokens and building
/// results.
pub mod utils;
