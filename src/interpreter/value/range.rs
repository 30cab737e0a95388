use crate::{error::EvaluationErrorKind, util::num::u64_to_f64};

/// An arithmetic progression `start, start + step, ...` that stops before
/// `end`.
///
/// A range may be a slice of a larger progression: elements are always
/// computed as `base + (offset + i) * step`, so splitting a range never
/// changes the numeric value of any element.
///
/// # Example
/// ```
/// use qformula::interpreter::value::range::Range;
///
/// let range = Range::new(1.0, 10.0, Some(2.0)).unwrap();
/// assert_eq!(range.count(), 5);
/// assert_eq!(range.get_element(-1), Some(9.0));
///
/// let (head, tail) = range.split(2);
/// assert_eq!(head.iter().chain(tail.iter()).collect::<Vec<_>>(),
///            range.iter().collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    base:   f64,
    end:    f64,
    step:   f64,
    offset: u64,
    count:  u64,
}

impl Range {
    /// Builds the range `start, start + step, ...` up to but excluding `end`.
    ///
    /// Without an explicit step, the step is `1` for ascending and `-1` for
    /// descending bounds. A step pointing away from `end` gives an empty
    /// range.
    ///
    /// # Errors
    /// `InvalidRange` if any bound is not finite or the step is zero.
    pub fn new(start: f64, end: f64, step: Option<f64>) -> Result<Self, EvaluationErrorKind> {
        let step = step.unwrap_or(if end < start { -1.0 } else { 1.0 });

        if !start.is_finite() || !end.is_finite() || !step.is_finite() {
            return Err(EvaluationErrorKind::InvalidRange { details: "The bounds and the step of a range must be finite numbers.".to_string() });
        }
        if step == 0.0 {
            return Err(EvaluationErrorKind::InvalidRange { details: "The step size of a range must not be zero.".to_string() });
        }

        Ok(Self { base: start,
                  end,
                  step,
                  offset: 0,
                  count: stable_count(start, end, step) })
    }

    /// Number of elements.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Returns `true` if the range has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// First element, or where the first element would be for an empty
    /// range.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.nth(0)
    }

    /// Exclusive upper (or lower, for negative steps) bound, as given when
    /// the range was built. The head of a split ends at the split point.
    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Distance between two consecutive elements.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Returns the element at `index`. Negative indices count from the end,
    /// so `-1` is the last element.
    #[must_use]
    pub fn get_element(&self, index: i64) -> Option<f64> {
        let index = if index < 0 {
            self.count.checked_sub(index.unsigned_abs())?
        } else {
            index.unsigned_abs()
        };

        (index < self.count).then(|| self.nth(index))
    }

    /// Splits the range before logical index `index`. The first part holds
    /// the elements `0..index`, the second the rest; an index past the end
    /// leaves the second part empty.
    #[must_use]
    pub fn split(&self, index: u64) -> (Self, Self) {
        let index = index.min(self.count);
        let head = Self { end: if index < self.count { self.nth(index) } else { self.end },
                          count: index,
                          ..*self };
        let tail = Self { offset: self.offset + index,
                          count: self.count - index,
                          ..*self };
        (head, tail)
    }

    /// Iterates over the elements in order.
    #[must_use]
    pub const fn iter(&self) -> RangeIter {
        RangeIter { range: *self,
                    next:  0, }
    }

    fn nth(&self, index: u64) -> f64 {
        self.step.mul_add(u64_to_f64(self.offset + index), self.base)
    }
}

impl IntoIterator for &Range {
    type IntoIter = RangeIter;
    type Item = f64;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`Range`].
#[derive(Debug, Clone)]
pub struct RangeIter {
    range: Range,
    next:  u64,
}

impl Iterator for RangeIter {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.range.count {
            return None;
        }
        let value = self.range.nth(self.next);
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.range.count - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Computes `ceil((end - start) / step)`, snapping quotients that are an
/// integer up to floating point noise, so `0.3 / 0.1` counts as `3`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stable_count(start: f64, end: f64, step: f64) -> u64 {
    let quotient = (end - start) / step;
    if quotient.is_nan() || quotient <= 0.0 {
        return 0;
    }

    let nearest = quotient.round();
    let tolerance = 1e-9_f64.max(nearest.abs() * 1e-13);
    let count = if (quotient - nearest).abs() <= tolerance {
        nearest
    } else {
        quotient.ceil()
    };

    // Saturates for absurdly large ranges.
    count as u64
}
