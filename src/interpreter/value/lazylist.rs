use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        input_stream::Position,
        token::Token,
        value::range::{Range, RangeIter},
    },
    util::num::format_number,
};

/// One constituent of a [`Lazylist`].
#[derive(Debug, Clone, PartialEq)]
pub enum LazyPart {
    /// A single value.
    Value(Token),
    /// A whole range, kept unexpanded.
    Range(Range),
}

impl LazyPart {
    fn count(&self) -> u64 {
        match self {
            Self::Value(_) => 1,
            Self::Range(range) => range.count(),
        }
    }
}

/// Container of single values and ranges that never expands its ranges.
///
/// Counting is O(1) and indexing is a binary search over the cumulative part
/// sizes, so a set like `{1:1e10}` costs as much as a set with one element.
///
/// # Example
/// ```
/// use qformula::interpreter::{
///     input_stream::Position,
///     token::Token,
///     value::{lazylist::Lazylist, range::Range},
/// };
///
/// let mut list = Lazylist::new();
/// list.append_value(Token::number(7.0, Position::default()));
/// list.append_range(Range::new(1.0, 1e10, None).unwrap());
///
/// assert_eq!(list.count(), 1 + 9_999_999_999);
/// assert_eq!(list.get(0).unwrap().as_number(), Some(7.0));
/// assert_eq!(list.get(3).unwrap().as_number(), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lazylist {
    parts: Vec<LazyPart>,
    ends:  Vec<u64>,
}

impl Lazylist {
    /// Creates an empty container.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new(),
               ends:  Vec::new(), }
    }

    /// Appends a single value.
    pub fn append_value(&mut self, value: Token) {
        self.push(LazyPart::Value(value));
    }

    /// Appends all elements of a range without expanding it.
    pub fn append_range(&mut self, range: Range) {
        if !range.is_empty() {
            self.push(LazyPart::Range(range));
        }
    }

    fn push(&mut self, part: LazyPart) {
        let end = self.count().saturating_add(part.count());
        self.parts.push(part);
        self.ends.push(end);
    }

    /// Total number of elements over all parts.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The constituent parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[LazyPart] {
        &self.parts
    }

    /// Returns the element at `index`, resolving into the right part.
    #[must_use]
    pub fn get(&self, index: u64) -> Option<Token> {
        let part_index = self.ends.partition_point(|&end| end <= index);
        let part = self.parts.get(part_index)?;
        let part_start = if part_index == 0 { 0 } else { self.ends[part_index - 1] };

        match part {
            LazyPart::Value(token) => Some(token.clone()),
            LazyPart::Range(range) => {
                let local = i64::try_from(index - part_start).ok()?;
                range.get_element(local)
                     .map(|n| Token::number(n, Position::default()))
            },
        }
    }

    /// Iterates over all elements, expanding ranges one element at a time.
    /// Every call starts a fresh pass.
    #[must_use]
    pub fn iter(&self) -> LazylistIter<'_> {
        LazylistIter { list:  self,
                       part:  0,
                       inner: None, }
    }

    /// Expands all elements into a vector.
    ///
    /// # Errors
    /// `OversizedCollection` if there are more than `limit` elements.
    pub fn materialize(&self, limit: usize) -> Result<Vec<Token>, EvaluationErrorKind> {
        if self.count() > u64::try_from(limit).unwrap_or(u64::MAX) {
            return Err(EvaluationErrorKind::OversizedCollection);
        }
        Ok(self.iter().collect())
    }

    /// Renders the set as a literal, writing ranges in `start:end:step`
    /// form so they stay compact.
    #[must_use]
    pub fn to_definition(&self) -> String {
        let elements = self.parts
                           .iter()
                           .map(|part| match part {
                               LazyPart::Value(token) => token.to_definition(),
                               LazyPart::Range(range) => format!("{}:{}:{}",
                                                                 format_number(range.start()),
                                                                 format_number(range.end()),
                                                                 format_number(range.step())),
                           })
                           .collect::<Vec<_>>();

        format!("{{{}}}", elements.join(", "))
    }
}

impl<'a> IntoIterator for &'a Lazylist {
    type IntoIter = LazylistIter<'a>;
    type Item = Token;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`Lazylist`].
#[derive(Debug, Clone)]
pub struct LazylistIter<'a> {
    list:  &'a Lazylist,
    part:  usize,
    inner: Option<RangeIter>,
}

impl Iterator for LazylistIter<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(inner) = &mut self.inner {
                if let Some(n) = inner.next() {
                    return Some(Token::number(n, Position::default()));
                }
                self.inner = None;
                self.part += 1;
            }

            match self.list.parts.get(self.part)? {
                LazyPart::Value(token) => {
                    self.part += 1;
                    return Some(token.clone());
                },
                LazyPart::Range(range) => self.inner = Some(range.iter()),
            }
        }
    }
}
