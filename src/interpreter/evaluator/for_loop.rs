use crate::interpreter::{
    evaluator::core::{EvalResult, Evaluator},
    parser::statement::ForLoop,
    value::variable::{Variable, VariableType},
};

impl Evaluator {
    /// Executes a `for` loop.
    ///
    /// The iterable is evaluated once. Lists yield their elements, sets their
    /// (expanded) elements and strings their characters. Each element is
    /// bound to the loop variable in the current scope before the body runs,
    /// so the variable keeps the last element after the loop.
    ///
    /// Loops produce no value; their effect is the assignments made in the
    /// body.
    ///
    /// # Example
    /// ```
    /// use qformula::interpreter::evaluator::core::{Evaluator, ScopeLayer};
    ///
    /// let mut evaluator = Evaluator::new();
    /// evaluator.push_scope(ScopeLayer::Global);
    ///
    /// let results = evaluator.evaluate_text("s = 0; for (i : [1, 2, 3]) { s = s + i }; s").unwrap();
    /// assert_eq!(results.last().unwrap().as_number(), Some(6.0));
    /// ```
    pub fn execute_for_loop(&mut self, for_loop: &ForLoop) -> EvalResult<()> {
        let iterable = self.execute(&for_loop.iterable)?;
        let elements = Self::elements_of(&iterable).map_err(|e| e.at(for_loop.iterable.position))?;

        for element in elements {
            let kind = VariableType::of(&element);
            if let Some(scope) = self.scope_stack.last_mut() {
                scope.variables.insert(for_loop.variable.clone(),
                                       Variable::new(for_loop.variable.as_str(), element, kind, None));
            }
            self.evaluate(&for_loop.body)?;
        }

        Ok(())
    }
}
