use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            function::{builtin, combinatorics, list, log, stats},
        },
        token::Token,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives a slice of evaluated argument values and returns the
/// result wrapped in `EvalResult`.
type BuiltinFn = fn(&[Token]) -> EvalResult<Token>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin is variadic with `n` required arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of all pure builtin functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "sin"        => { arity: Arity::Exact(1), func: builtin::sin },
    "cos"        => { arity: Arity::Exact(1), func: builtin::cos },
    "tan"        => { arity: Arity::Exact(1), func: builtin::tan },
    "asin"       => { arity: Arity::Exact(1), func: builtin::asin },
    "acos"       => { arity: Arity::Exact(1), func: builtin::acos },
    "atan"       => { arity: Arity::Exact(1), func: builtin::atan },
    "sinh"       => { arity: Arity::Exact(1), func: builtin::sinh },
    "cosh"       => { arity: Arity::Exact(1), func: builtin::cosh },
    "tanh"       => { arity: Arity::Exact(1), func: builtin::tanh },
    "asinh"      => { arity: Arity::Exact(1), func: builtin::asinh },
    "acosh"      => { arity: Arity::Exact(1), func: builtin::acosh },
    "atanh"      => { arity: Arity::Exact(1), func: builtin::atanh },
    "exp"        => { arity: Arity::Exact(1), func: builtin::exp },
    "sqrt"       => { arity: Arity::Exact(1), func: builtin::sqrt },
    "abs"        => { arity: Arity::Exact(1), func: builtin::abs },
    "ceil"       => { arity: Arity::Exact(1), func: builtin::ceil },
    "floor"      => { arity: Arity::Exact(1), func: builtin::floor },
    "sign"       => { arity: Arity::Exact(1), func: builtin::sign },
    "round"      => { arity: Arity::OneOf(&[1, 2]), func: builtin::round },
    "atan2"      => { arity: Arity::Exact(2), func: builtin::atan2 },
    "fmod"       => { arity: Arity::Exact(2), func: builtin::fmod },
    "pi"         => { arity: Arity::Exact(0), func: builtin::pi },
    "ln"         => { arity: Arity::Exact(1), func: log::ln },
    "log"        => { arity: Arity::OneOf(&[1, 2]), func: log::log },
    "log10"      => { arity: Arity::Exact(1), func: |args| log::log_base(args, 10.0) },
    "lg"         => { arity: Arity::Exact(1), func: |args| log::log_base(args, 10.0) },
    "lb"         => { arity: Arity::Exact(1), func: |args| log::log_base(args, 2.0) },
    "log2"       => { arity: Arity::Exact(1), func: |args| log::log_base(args, 2.0) },
    "fact"       => { arity: Arity::Exact(1), func: combinatorics::fact },
    "ncr"        => { arity: Arity::Exact(2), func: combinatorics::ncr },
    "npr"        => { arity: Arity::Exact(2), func: combinatorics::npr },
    "gcd"        => { arity: Arity::Exact(2), func: combinatorics::gcd },
    "lcm"        => { arity: Arity::Exact(2), func: combinatorics::lcm },
    "stdnormpdf" => { arity: Arity::Exact(1), func: stats::stdnormpdf },
    "stdnormcdf" => { arity: Arity::Exact(1), func: stats::stdnormcdf },
    "normcdf"    => { arity: Arity::Exact(3), func: stats::normcdf },
    "len"        => { arity: Arity::Exact(1), func: list::len },
    "sum"        => { arity: Arity::AtLeast(1), func: list::sum },
    "min"        => { arity: Arity::AtLeast(1), func: |args| list::min_max("min", args) },
    "max"        => { arity: Arity::AtLeast(1), func: |args| list::min_max("max", args) },
    "sort"       => { arity: Arity::Exact(1), func: list::sort },
    "concat"     => { arity: Arity::AtLeast(1), func: list::concat },
    "join"       => { arity: Arity::Exact(2), func: list::join },
    "str"        => { arity: Arity::Exact(1), func: list::str },
    "pick"       => { arity: Arity::AtLeast(2), func: list::pick },
    "fill"       => { arity: Arity::Exact(2), func: list::fill },
}

/// Builtins that need the evaluator's state (its random generator or its
/// variables) and are therefore dispatched by [`Evaluator::call_function`]
/// directly.
pub const STATEFUL_FUNCTIONS: &[&str] = &["shuffle", "diff"];

/// Math functions allowed in a numerical formula answer.
pub const FORMULA_FUNCTIONS: &[&str] = &["sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh",
                                         "acosh", "atanh", "exp", "sqrt", "abs", "ceil", "floor", "sign", "round",
                                         "atan2", "fmod", "pi", "ln", "log", "log10", "lg", "lb", "log2", "fact", "ncr",
                                         "npr", "gcd", "lcm", "stdnormpdf", "stdnormcdf", "normcdf"];

/// Returns `true` if `name` is a function of the builtin library.
///
/// # Example
/// ```
/// use qformula::interpreter::evaluator::function::core::is_builtin_function;
///
/// assert!(is_builtin_function("sin"));
/// assert!(is_builtin_function("shuffle"));
/// assert!(!is_builtin_function("x"));
/// ```
#[must_use]
pub fn is_builtin_function(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name) || STATEFUL_FUNCTIONS.contains(&name)
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }

    /// Human readable form for error messages, e.g. `2 or 3 arguments`.
    fn describe(&self) -> String {
        fn arguments(n: usize) -> &'static str {
            if n == 1 { "argument" } else { "arguments" }
        }

        match self {
            Self::Exact(n) => format!("{n} {}", arguments(*n)),
            Self::OneOf(arr) => {
                let counts = arr.iter().map(ToString::to_string).collect::<Vec<_>>();
                let last = arr.last().copied().unwrap_or(0);
                match counts.split_last() {
                    Some((tail, head)) if !head.is_empty() => {
                        format!("{} or {tail} {}", head.join(", "), arguments(last))
                    },
                    _ => format!("{} {}", counts.join(""), arguments(last)),
                }
            },
            Self::AtLeast(n) => format!("at least {n} {}", arguments(*n)),
        }
    }
}

fn check_arity(name: &str, arity: Arity, args: &[Token]) -> EvalResult<()> {
    if arity.check(args.len()) {
        Ok(())
    } else {
        Err(EvaluationErrorKind::ArgumentCount { name:     name.to_string(),
                                                 expected: arity.describe(),
                                                 found:    args.len(), }.into())
    }
}

impl Evaluator {
    /// Evaluates a function call.
    ///
    /// Pure builtins are looked up in the function table; `shuffle` and
    /// `diff` use the evaluator's random generator.
    ///
    /// # Parameters
    /// - `name`: Function name.
    /// - `args`: Evaluated argument values.
    ///
    /// # Returns
    /// The function result or an error if lookup or arity fails.
    pub fn call_function(&mut self, name: &str, args: &[Token]) -> EvalResult<Token> {
        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == name) {
            check_arity(name, builtin.arity, args)?;
            return (builtin.func)(args);
        }

        match name {
            "shuffle" => {
                check_arity(name, Arity::Exact(1), args)?;
                self.shuffled_copy(&args[0])
            },
            "diff" => {
                check_arity(name, Arity::OneOf(&[2, 3]), args)?;
                self.diff(args)
            },
            _ => Err(EvaluationErrorKind::UnknownFunction { name: name.to_string() }.into()),
        }
    }
}
