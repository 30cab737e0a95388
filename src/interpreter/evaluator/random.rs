use rand::Rng;

use crate::interpreter::{
    evaluator::core::{EvalResult, Evaluator},
    token::Token,
    value::{
        lazylist::Lazylist,
        random_variable::RandomVariable,
        variable::{Variable, VariableType},
    },
};

impl Evaluator {
    /// Defines `name` as a random permutation of the list computed by the
    /// RPN `argument`. Used for `name = shuffle(list)` in the random layer.
    pub(crate) fn define_permutation(&mut self, name: &str, argument: &[Token]) -> EvalResult<Token> {
        let value = self.execute_rpn(argument)?;

        let mut candidates = Lazylist::new();
        for element in Self::elements_of(&value)? {
            candidates.append_value(element);
        }
        self.define_random_variable(RandomVariable::new(name, candidates, true)?);

        Ok(value)
    }

    /// Draws a value for every random variable and binds it in the random
    /// layer, so that later layers can use it like any other variable.
    ///
    /// # Example
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use qformula::interpreter::evaluator::core::{Evaluator, ScopeLayer};
    ///
    /// let mut evaluator = Evaluator::new();
    /// evaluator.evaluate_text("a = {1, 2, 3}").unwrap();
    /// evaluator.instantiate_random_variables(&mut StdRng::seed_from_u64(7));
    ///
    /// evaluator.push_scope(ScopeLayer::Global);
    /// let b = evaluator.evaluate_text("b = 10 * a").unwrap()[0].as_number().unwrap();
    /// assert!([10.0, 20.0, 30.0].contains(&b));
    /// ```
    pub fn instantiate_random_variables<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut bindings = Vec::with_capacity(self.random_variables.len());
        for random_variable in &mut self.random_variables {
            let name = random_variable.name().to_string();
            if let Some(value) = random_variable.instantiate(rng) {
                bindings.push((name, value.clone()));
            }
        }

        if let Some(random_layer) = self.scope_stack.first_mut() {
            for (name, value) in bindings {
                let kind = VariableType::of(&value);
                random_layer.variables
                            .insert(name.clone(), Variable::new(name, value, kind, None));
            }
        }
    }

    /// Renders all instantiated random variables as assignments, e.g.
    /// `a = 2;b = [3, 1, 2];`, for storing a dataset and replaying it later.
    #[must_use]
    pub fn export_randomvars_for_storage(&self) -> String {
        self.random_variables
            .iter()
            .map(RandomVariable::get_instantiated_definition)
            .collect()
    }

    /// Number of different datasets the random variables can produce,
    /// saturating at `u64::MAX`.
    #[must_use]
    pub fn how_many_datasets(&self) -> u64 {
        self.random_variables
            .iter()
            .fold(1, |acc: u64, rv| acc.saturating_mul(rv.how_many()))
    }
}
