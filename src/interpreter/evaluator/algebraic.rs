use std::collections::HashMap;

use rand::Rng;

use crate::{
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, ScopeLayer},
            utils::{expect_list, expect_number, invalid_argument, number},
        },
        input_stream::Position,
        parser::{core::Parser, statement::Statement},
        token::{Token, TokenType, TokenValue},
        value::{
            lazylist::Lazylist,
            variable::{Variable, VariableType},
        },
    },
    util::num::{f64_to_u64_checked, u64_to_f64},
};

/// Samples taken by `diff()` when no count is given.
pub const DEFAULT_DIFF_SAMPLES: u64 = 100;

impl Evaluator {
    /// `diff(a, b[, n])` compares two lists element by element.
    ///
    /// Pairs of numbers give their absolute difference. Any other pair is
    /// read as two formulas and compared with [`Evaluator::algebraic_diff`]
    /// at `n` random points.
    pub(crate) fn diff(&mut self, args: &[Token]) -> EvalResult<Token> {
        let first = expect_list(&args[0])?;
        let second = expect_list(&args[1])?;
        let samples = match args.get(2) {
            Some(n) => f64_to_u64_checked(expect_number(n)?)?,
            None => DEFAULT_DIFF_SAMPLES,
        };

        if first.len() != second.len() {
            return Err(invalid_argument("diff() needs two lists of the same length."));
        }

        let mut rng = self.rng.clone();
        let mut differences = Vec::with_capacity(first.len());
        for (a, b) in first.iter().zip(second) {
            let difference = match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => (x - y).abs(),
                _ => self.algebraic_diff(&a.to_string(), &b.to_string(), samples, &mut rng)?,
            };
            differences.push(number(difference));
        }
        self.rng = rng;

        Ok(Token::list(differences, Position::default()))
    }

    /// Compares two formulas by evaluating both at `samples` random points
    /// and returns the root mean square of the differences.
    ///
    /// At every point each algebraic variable takes a random element of its
    /// set. Both formulas may use all variables defined so far; the last
    /// statement of each gives its value.
    ///
    /// # Errors
    /// `InvalidArgument` if a formula does not parse or `samples` is zero,
    /// and any evaluation error of the formulas.
    ///
    /// # Example
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use qformula::interpreter::evaluator::core::{Evaluator, ScopeLayer};
    ///
    /// let mut evaluator = Evaluator::new();
    /// evaluator.push_scope(ScopeLayer::Global);
    /// evaluator.evaluate_text("x = {1:10:0.5}").unwrap();
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let same = evaluator.algebraic_diff("(x+1)^2", "x^2+2x+1", 50, &mut rng).unwrap();
    /// let other = evaluator.algebraic_diff("(x+1)^2", "x^2+1", 50, &mut rng).unwrap();
    /// assert!(same < 1e-9);
    /// assert!(other > 1.0);
    /// ```
    pub fn algebraic_diff<R: Rng + ?Sized>(&mut self,
                                           a: &str,
                                           b: &str,
                                           samples: u64,
                                           rng: &mut R)
                                           -> EvalResult<f64> {
        if samples == 0 {
            return Err(invalid_argument("diff() needs at least one sample."));
        }

        let names = self.variable_names();
        let known = names.iter().map(String::as_str).collect::<Vec<_>>();
        let parse = |formula: &str| {
            Parser::new(formula, &known).map(Parser::into_statements)
                                        .map_err(|e| invalid_argument(format!("Cannot read the formula '{formula}': {e}")))
        };
        let first = parse(a)?;
        let second = parse(b)?;

        let variables = self.algebraic_variables();
        let mut squares = 0.0;

        for _ in 0..samples {
            self.push_scope(ScopeLayer::Local);
            let outcome = self.sample_difference(&variables, &first, &second, rng);
            self.pop_scope();

            let difference = outcome?;
            squares += difference * difference;
        }

        Ok((squares / u64_to_f64(samples)).sqrt())
    }

    fn sample_difference<R: Rng + ?Sized>(&mut self,
                                          variables: &[(String, Lazylist)],
                                          first: &[Statement],
                                          second: &[Statement],
                                          rng: &mut R)
                                          -> EvalResult<f64> {
        for (name, values) in variables {
            let Some(value) = values.get(rng.random_range(0..values.count())) else {
                continue;
            };
            let kind = VariableType::of(&value);
            if let Some(scope) = self.scope_stack.last_mut() {
                scope.variables.insert(name.clone(), Variable::new(name.as_str(), value, kind, None));
            }
        }

        let x = self.formula_value(first)?;
        let y = self.formula_value(second)?;
        Ok(x - y)
    }

    fn formula_value(&mut self, statements: &[Statement]) -> EvalResult<f64> {
        let results = self.evaluate(statements)?;
        let last = results.last()
                          .ok_or_else(|| invalid_argument("diff() cannot compare an empty formula."))?;
        expect_number(last)
    }

    /// The visible algebraic variables with their sample sets. Variables of
    /// upper layers shadow those below.
    fn algebraic_variables(&self) -> Vec<(String, Lazylist)> {
        let mut visible: HashMap<&str, &Variable> = HashMap::new();
        for scope in &self.scope_stack {
            for (name, variable) in &scope.variables {
                visible.insert(name.as_str(), variable);
            }
        }

        let mut variables = visible.into_iter()
                                   .filter(|(_, v)| v.kind == VariableType::Algebraic)
                                   .filter_map(|(name, v)| match v.value.value() {
                                       TokenValue::Set(set) if v.value.kind() == TokenType::Set && !set.is_empty() => {
                                           Some((name.to_string(), set.clone()))
                                       },
                                       _ => None,
                                   })
                                   .collect::<Vec<_>>();
        variables.sort_by(|a, b| a.0.cmp(&b.0));
        variables
    }
}
