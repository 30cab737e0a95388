/// Arithmetic progressions.
///
/// Defines the `Range` type behind set and list literals such as
/// `{1:10:0.5}`. A range knows its element count and any element by index
/// without expanding itself.
pub mod range;
/// Lazy element containers.
///
/// Defines `Lazylist`, the storage behind set values. It accumulates single
/// values and whole ranges and supports counting, indexing and iteration
/// without materializing the ranges.
pub mod lazylist;
/// Evaluated variables.
///
/// Defines the `Variable` type stored in evaluation scopes, together with
/// its type tag and definition timestamp.
pub mod variable;
/// Random variables.
///
/// Defines `RandomVariable`, a name bound to a set of candidate values (or a
/// list to be shuffled) that is instantiated once per dataset.
pub mod random_variable;
