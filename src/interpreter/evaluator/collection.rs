use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, Operand},
            utils::{expect_integer, expect_number, resolve_index},
        },
        input_stream::Position,
        token::{MAX_LIST_ELEMENTS, RawValue, Token, TokenType, TokenValue},
        value::{lazylist::Lazylist, range::Range},
    },
};

impl Evaluator {
    /// Builds a range from its `start:end` or `start:end:step` parts.
    ///
    /// # Errors
    /// `InvalidRange` for a wrong number of parts, non-numeric parts, a zero
    /// step or non-finite bounds.
    ///
    /// # Example
    /// ```
    /// use qformula::interpreter::{
    ///     evaluator::core::Evaluator,
    ///     input_stream::Position,
    ///     token::Token,
    /// };
    ///
    /// let parts = [1.0, 2.0, 0.25].map(|n| Token::number(n, Position::default()));
    /// assert_eq!(Evaluator::build_range(&parts).unwrap().count(), 4);
    /// ```
    pub fn build_range(parts: &[Token]) -> EvalResult<Range> {
        let bounds = parts.iter()
                          .map(|part| {
                              part.as_number().ok_or_else(|| {
                                                  EvaluationErrorKind::InvalidRange { details: format!("Range bounds must be numbers, found {}.", part.describe()) }
                                              })
                          })
                          .collect::<Result<Vec<_>, _>>()?;

        let range = match bounds.as_slice() {
            [start, end] => Range::new(*start, *end, None)?,
            [start, end, step] => Range::new(*start, *end, Some(*step))?,
            _ => {
                return Err(EvaluationErrorKind::InvalidRange { details: "A range needs a start, an end and an optional step.".to_string() }.into());
            },
        };
        Ok(range)
    }

    /// Builds a set from resolved elements. Ranges stay unexpanded, so sets
    /// of any size are cheap.
    pub(crate) fn build_set(elements: Vec<Operand>) -> EvalResult<Token> {
        let mut set = Lazylist::new();
        for element in elements {
            match element {
                Operand::Value(token) => set.append_value(token.with_position(Position::default())),
                Operand::Range(range) => set.append_range(range),
            }
        }
        Ok(Token::set(set, Position::default()))
    }

    /// Builds a list from resolved elements, expanding ranges in place.
    ///
    /// # Errors
    /// `OversizedCollection` if the list would hold more than
    /// [`MAX_LIST_ELEMENTS`] scalars.
    pub(crate) fn build_list(elements: Vec<Operand>) -> EvalResult<Token> {
        let limit = u64::try_from(MAX_LIST_ELEMENTS).unwrap_or(u64::MAX);
        let mut items = Vec::with_capacity(elements.len());

        for element in elements {
            match element {
                Operand::Value(token) => items.push(RawValue::Token(Box::new(token.with_position(Position::default())))),
                Operand::Range(range) if range.count() > limit => {
                    return Err(EvaluationErrorKind::OversizedCollection.into());
                },
                Operand::Range(range) => items.extend(range.iter().map(RawValue::Number)),
            }
        }

        Token::wrap(RawValue::List(items), Some(TokenType::List), Position::default())
    }

    /// Evaluates `collection[index]` on lists, sets and strings.
    ///
    /// Negative indices count from the end, so `[1, 2, 3][-1]` is `3`.
    ///
    /// # Errors
    /// `NonIntegerValue` for fractional indices, `IndexOutOfRange` for
    /// indices past either end and `InvalidOperand` for values that cannot
    /// be indexed.
    ///
    /// # Example
    /// ```
    /// use qformula::interpreter::{
    ///     evaluator::core::Evaluator,
    ///     input_stream::Position,
    ///     token::Token,
    /// };
    ///
    /// let word = Token::string("hello", Position::default());
    /// let last = Token::number(-1.0, Position::default());
    /// assert_eq!(Evaluator::eval_index(&word, &last).unwrap().as_str(), Some("o"));
    /// ```
    pub fn eval_index(collection: &Token, index: &Token) -> EvalResult<Token> {
        let index = expect_integer(index)?;
        let out_of_range = || EvaluationErrorKind::IndexOutOfRange { index: index.to_string() };

        match collection.value() {
            TokenValue::List(elements) => {
                let i = resolve_index(index, u64::try_from(elements.len()).unwrap_or(u64::MAX))?;
                usize::try_from(i).ok()
                                  .and_then(|i| elements.get(i))
                                  .cloned()
                                  .ok_or_else(|| out_of_range().into())
            },
            TokenValue::Set(set) => {
                let i = resolve_index(index, set.count())?;
                set.get(i).ok_or_else(|| out_of_range().into())
            },
            TokenValue::Str(text) if collection.kind() == TokenType::String => {
                let chars = text.chars().collect::<Vec<_>>();
                let i = resolve_index(index, u64::try_from(chars.len()).unwrap_or(u64::MAX))?;
                usize::try_from(i).ok()
                                  .and_then(|i| chars.get(i))
                                  .map(|c| Token::string(c.to_string(), Position::default()))
                                  .ok_or_else(|| out_of_range().into())
            },
            _ => Err(EvaluationErrorKind::InvalidOperand { operator: "[]".to_string(),
                                                           found:    collection.describe(), }.into()),
        }
    }

    /// Converts an iterable value into the sequence of its elements.
    ///
    /// Lists yield their elements, sets are expanded (at most
    /// [`MAX_LIST_ELEMENTS`] elements) and strings yield one string per
    /// character.
    ///
    /// # Errors
    /// `OversizedCollection` for huge sets, `ExpectedList` for scalars.
    pub fn elements_of(value: &Token) -> EvalResult<Vec<Token>> {
        match value.value() {
            TokenValue::List(elements) => Ok(elements.clone()),
            TokenValue::Set(set) => Ok(set.materialize(MAX_LIST_ELEMENTS)?),
            TokenValue::Str(text) if value.kind() == TokenType::String => {
                Ok(text.chars()
                       .map(|c| Token::string(c.to_string(), Position::default()))
                       .collect())
            },
            _ => Err(EvaluationErrorKind::ExpectedList { found: value.describe() }.into()),
        }
    }
}

/// Extracts numbers from a list of elements.
///
/// # Errors
/// `ExpectedNumber` for the first non-numeric element.
pub fn numbers_of(elements: &[Token]) -> EvalResult<Vec<f64>> {
    elements.iter().map(expect_number).collect()
}
