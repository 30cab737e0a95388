use rand::seq::SliceRandom;

use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            collection::numbers_of,
            core::{EvalResult, Evaluator},
            utils::{expect_list, expect_number, invalid_argument, number},
        },
        input_stream::Position,
        token::{MAX_LIST_ELEMENTS, RawValue, Token, TokenType, TokenValue},
    },
    util::num::{f64_to_u64_checked, u64_to_f64, usize_to_f64},
};

/// The values a variadic function works on: the elements of a single list
/// argument, or the arguments themselves.
fn operands(args: &[Token]) -> &[Token] {
    match args {
        [single] if single.kind() == TokenType::List => expect_list(single).unwrap_or(args),
        _ => args,
    }
}

fn wrap_list(items: Vec<RawValue>) -> EvalResult<Token> {
    Token::wrap(RawValue::List(items), Some(TokenType::List), Position::default())
}

/// Number of elements of a list or set, or characters of a string.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::list::len,
///     input_stream::Position,
///     token::Token,
/// };
///
/// let word = Token::string("héllo", Position::default());
/// assert_eq!(len(&[word]).unwrap().as_number(), Some(5.0));
/// ```
pub fn len(args: &[Token]) -> EvalResult<Token> {
    let count = match args[0].value() {
        TokenValue::List(elements) => usize_to_f64(elements.len()),
        TokenValue::Set(set) => u64_to_f64(set.count()),
        TokenValue::Str(text) if args[0].kind() == TokenType::String => usize_to_f64(text.chars().count()),
        _ => return Err(EvaluationErrorKind::ExpectedList { found: args[0].describe() }.into()),
    };
    Ok(number(count))
}

/// Sum of a list of numbers, or of all arguments.
pub fn sum(args: &[Token]) -> EvalResult<Token> {
    Ok(number(numbers_of(operands(args))?.iter().sum()))
}

/// Smallest or largest of a list of numbers, or of all arguments.
pub fn min_max(name: &str, args: &[Token]) -> EvalResult<Token> {
    let values = numbers_of(operands(args))?;
    let pick: fn(f64, f64) -> f64 = if name == "min" { f64::min } else { f64::max };

    values.into_iter()
          .reduce(pick)
          .map(number)
          .ok_or_else(|| invalid_argument(format!("{name}() of an empty list is not defined.")))
}

/// Sorts a list of numbers numerically or a list of strings
/// lexicographically.
///
/// # Errors
/// `InvalidArgument` for lists mixing numbers with other values.
pub fn sort(args: &[Token]) -> EvalResult<Token> {
    let elements = expect_list(&args[0])?;

    let sorted = if elements.iter().all(|e| e.kind() == TokenType::String) {
        let mut strings = elements.to_vec();
        strings.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
        strings
    } else if elements.iter().all(|e| e.kind() == TokenType::Number) {
        let mut numbers = elements.to_vec();
        numbers.sort_by(|a, b| a.as_number().unwrap_or(0.0).total_cmp(&b.as_number().unwrap_or(0.0)));
        numbers
    } else {
        return Err(invalid_argument("sort() needs a list of only numbers or only strings."));
    };

    Ok(Token::list(sorted, Position::default()))
}

/// Concatenates lists into one list.
pub fn concat(args: &[Token]) -> EvalResult<Token> {
    let mut items = Vec::new();
    for arg in args {
        items.extend(expect_list(arg)?
                       .iter()
                       .map(|element| RawValue::Token(Box::new(element.clone()))));
    }
    wrap_list(items)
}

/// `join(separator, list)`: joins the elements' text forms.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     evaluator::function::list::join,
///     input_stream::Position,
///     token::Token,
/// };
///
/// let separator = Token::string("-", Position::default());
/// let list = Token::list(vec![Token::number(1.0, Position::default()),
///                             Token::string("a", Position::default())],
///                        Position::default());
/// assert_eq!(join(&[separator, list]).unwrap().as_str(), Some("1-a"));
/// ```
pub fn join(args: &[Token]) -> EvalResult<Token> {
    let separator = args[0].as_str()
                           .filter(|_| args[0].kind() == TokenType::String)
                           .ok_or_else(|| invalid_argument("The separator of join() must be a string."))?;
    let parts = expect_list(&args[1])?.iter().map(ToString::to_string).collect::<Vec<_>>();
    Ok(Token::string(parts.join(separator), Position::default()))
}

/// Text form of a value.
pub fn str(args: &[Token]) -> EvalResult<Token> {
    Ok(Token::string(args[0].to_string(), Position::default()))
}

/// `pick(i, a, b, ...)` returns the `i`-th (zero based, rounded down)
/// candidate; `pick(i, list)` picks from the list. An index outside the
/// candidates yields the first one.
pub fn pick(args: &[Token]) -> EvalResult<Token> {
    let index = expect_number(&args[0])?.floor();
    let candidates = operands(&args[1..]);

    let chosen = if index >= 0.0 && index < usize_to_f64(candidates.len()) {
        f64_to_u64_checked(index).ok()
                                 .and_then(|i| usize::try_from(i).ok())
                                 .and_then(|i| candidates.get(i))
    } else {
        None
    };

    chosen.or_else(|| candidates.first())
          .cloned()
          .ok_or_else(|| invalid_argument("pick() needs at least one candidate."))
}

/// `fill(n, value)`: a list holding `n` copies of `value`.
pub fn fill(args: &[Token]) -> EvalResult<Token> {
    let count = f64_to_u64_checked(expect_number(&args[0])?)?;
    let count = usize::try_from(count).map_err(|_| EvaluationErrorKind::OversizedCollection)?;
    if count > MAX_LIST_ELEMENTS {
        return Err(EvaluationErrorKind::OversizedCollection.into());
    }
    wrap_list(vec![RawValue::Token(Box::new(args[1].clone())); count])
}

impl Evaluator {
    /// Returns a shuffled copy of a list, drawing from the evaluator's
    /// random generator.
    pub(crate) fn shuffled_copy(&mut self, value: &Token) -> EvalResult<Token> {
        let mut elements = Self::elements_of(value)?;
        elements.shuffle(&mut self.rng);
        Ok(Token::list(elements, Position::default()))
    }
}
