use rand::{Rng, seq::SliceRandom};

use crate::{
    error::EvaluationErrorKind,
    interpreter::{
        input_stream::Position,
        token::{MAX_LIST_ELEMENTS, Token},
        value::lazylist::Lazylist,
    },
    util::num::saturating_factorial,
};

/// A variable whose value is drawn at random, once per dataset.
///
/// Without the shuffle flag the value is one of the candidates. With it, the
/// candidates are the elements of a list and the value is a random
/// permutation of that list.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomVariable {
    name:       String,
    candidates: Lazylist,
    shuffle:    bool,
    value:      Option<Token>,
}

impl RandomVariable {
    /// Creates an uninstantiated random variable.
    ///
    /// # Errors
    /// `InvalidArgument` if there are no candidates, `OversizedCollection` if
    /// a list to be shuffled is too long.
    pub fn new(name: impl Into<String>, candidates: Lazylist, shuffle: bool) -> Result<Self, EvaluationErrorKind> {
        let name = name.into();
        if candidates.is_empty() {
            return Err(EvaluationErrorKind::InvalidArgument { details: format!("Random variable '{name}' needs at least one value.") });
        }
        if shuffle && candidates.count() > MAX_LIST_ELEMENTS as u64 {
            return Err(EvaluationErrorKind::OversizedCollection);
        }

        Ok(Self { name,
                  candidates,
                  shuffle,
                  value: None })
    }

    /// The variable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the value is a permutation of the candidates.
    #[must_use]
    pub const fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    /// The instantiated value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&Token> {
        self.value.as_ref()
    }

    /// Number of distinct values the variable can take. For shuffled lists
    /// this is `n!`, saturating at `u64::MAX`.
    ///
    /// # Example
    /// ```
    /// use qformula::interpreter::{
    ///     input_stream::Position,
    ///     token::Token,
    ///     value::{lazylist::Lazylist, random_variable::RandomVariable},
    /// };
    ///
    /// let mut candidates = Lazylist::new();
    /// for i in 0..4 {
    ///     candidates.append_value(Token::number(f64::from(i), Position::default()));
    /// }
    ///
    /// let pick = RandomVariable::new("a", candidates.clone(), false).unwrap();
    /// let perm = RandomVariable::new("b", candidates, true).unwrap();
    /// assert_eq!(pick.how_many(), 4);
    /// assert_eq!(perm.how_many(), 24);
    /// ```
    #[must_use]
    pub fn how_many(&self) -> u64 {
        if self.shuffle {
            saturating_factorial(self.candidates.count())
        } else {
            self.candidates.count()
        }
    }

    /// Draws a new value uniformly at random and returns it.
    pub fn instantiate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Token> {
        let value = if self.shuffle {
            let mut elements: Vec<Token> = self.candidates.iter().collect();
            elements.shuffle(rng);
            Token::list(elements, Position::default())
        } else {
            let index = rng.random_range(0..self.candidates.count());
            self.candidates.get(index)?
        };

        self.value = Some(value);
        self.value.as_ref()
    }

    /// Renders the instantiated value as an assignment that can be parsed
    /// again, e.g. `a = 3;`. Empty until the variable is instantiated.
    #[must_use]
    pub fn get_instantiated_definition(&self) -> String {
        self.value
            .as_ref()
            .map(|value| format!("{} = {};", self.name, value.to_definition()))
            .unwrap_or_default()
    }
}
