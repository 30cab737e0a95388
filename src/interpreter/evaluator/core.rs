use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::{Error, EvaluationError, EvaluationErrorKind},
    interpreter::{
        evaluator::utils::{check_finite, expect_number},
        parser::{
            core::Parser,
            shunting_yard::{ARRAY_BUILD, INDEX, NEGATION, RANGE_BUILD, SET_BUILD, TERNARY},
            statement::{Expression, Statement},
        },
        token::{Token, TokenType, TokenValue},
        value::{
            random_variable::RandomVariable,
            range::Range,
            variable::{Variable, VariableType},
        },
    },
    util::num::f64_to_u64_checked,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or an
/// `EvaluationError` describing the failure.
pub type EvalResult<T> = Result<T, EvaluationError>;

/// The role of a scope in the variable stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeLayer {
    /// Random variables: assigning a set defines a random variable.
    Random,
    /// Variables shared by all parts of a question.
    Global,
    /// Variables of a single part.
    Local,
}

/// One level of the variable stack.
#[derive(Debug, Clone)]
pub struct Scope {
    /// What assignments in this scope mean.
    pub layer:     ScopeLayer,
    /// The variables defined at this level.
    pub variables: HashMap<String, Variable>,
}

impl Scope {
    fn new(layer: ScopeLayer) -> Self {
        Self { layer,
               variables: HashMap::new() }
    }
}

/// An entry of the RPN operand stack.
#[derive(Debug, Clone)]
pub(crate) enum Operand {
    Value(Token),
    Range(Range),
}

/// Executes parsed statements against a layered variable scope.
///
/// The scope starts with a single random layer; global and local layers are
/// stacked on top with [`Evaluator::push_scope`]. Lookups search from the
/// top, so later layers shadow earlier ones.
///
/// ## Usage
/// ```
/// use qformula::interpreter::evaluator::core::{Evaluator, ScopeLayer};
///
/// let mut evaluator = Evaluator::new();
/// evaluator.push_scope(ScopeLayer::Global);
///
/// let results = evaluator.evaluate_text("a = 3; b = a^2 + 1").unwrap();
/// assert_eq!(results[1].as_number(), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    pub(crate) scope_stack:      Vec<Scope>,
    pub(crate) random_variables: Vec<RandomVariable>,
    pub(crate) rng:              StdRng,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates an evaluator with an empty random layer, drawing random
    /// numbers from an OS-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates an evaluator whose internal random choices (`shuffle`,
    /// `diff`) are reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self { scope_stack: vec![Scope::new(ScopeLayer::Random)],
               random_variables: Vec::new(),
               rng }
    }

    /// Opens a new scope on top of the stack.
    pub fn push_scope(&mut self, layer: ScopeLayer) {
        self.scope_stack.push(Scope::new(layer));
    }

    /// Closes the topmost scope. The bottom random layer is never removed.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        if self.scope_stack.len() > 1 { self.scope_stack.pop() } else { None }
    }

    /// The layer that assignments currently go to.
    #[must_use]
    pub fn current_layer(&self) -> ScopeLayer {
        self.scope_stack.last().map_or(ScopeLayer::Random, |scope| scope.layer)
    }

    /// Looks a variable up, searching from the top scope down.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Variable> {
        self.scope_stack.iter().rev().find_map(|scope| scope.variables.get(name))
    }

    /// The random variables in definition order.
    #[must_use]
    pub fn random_variables(&self) -> &[RandomVariable] {
        &self.random_variables
    }

    /// Names of all variables and random variables, for use as known
    /// variables when parsing text that refers to them.
    #[must_use]
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = self.scope_stack
                            .iter()
                            .flat_map(|scope| scope.variables.keys().cloned())
                            .chain(self.random_variables.iter().map(|rv| rv.name().to_string()))
                            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        names
    }

    /// Binds a value in the top scope.
    ///
    /// In the random layer a set defines a random variable. In the other
    /// layers a set defines an algebraic variable whose elements serve as
    /// sample values. Any other value replaces the previous binding.
    ///
    /// # Errors
    /// Fails if a random variable cannot be built from the value.
    pub fn assign(&mut self, name: &str, value: Token) -> EvalResult<Token> {
        let layer = self.current_layer();

        let kind = match value.value() {
            TokenValue::Set(set) if layer == ScopeLayer::Random => {
                self.define_random_variable(RandomVariable::new(name, set.clone(), false)?);
                return Ok(value);
            },
            TokenValue::Set(_) => VariableType::Algebraic,
            _ => VariableType::of(&value),
        };

        if let Some(scope) = self.scope_stack.last_mut() {
            scope.variables
                 .insert(name.to_string(), Variable::new(name, value.clone(), kind, None));
        }
        Ok(value)
    }

    /// Adds a random variable, replacing one with the same name.
    pub(crate) fn define_random_variable(&mut self, variable: RandomVariable) {
        match self.random_variables.iter_mut().find(|rv| rv.name() == variable.name()) {
            Some(existing) => *existing = variable,
            None => self.random_variables.push(variable),
        }
    }

    /// Parses `text`, treating all currently defined names as known
    /// variables, and evaluates it.
    ///
    /// # Errors
    /// The syntax error or the first evaluation error.
    pub fn evaluate_text(&mut self, text: &str) -> Result<Vec<Token>, Error> {
        let names = self.variable_names();
        let known = names.iter().map(String::as_str).collect::<Vec<_>>();
        let parser = Parser::new(text, &known)?;
        Ok(self.evaluate(parser.statements())?)
    }

    /// Evaluates statements in order and returns the value of every
    /// expression statement. Loops produce no value.
    ///
    /// Evaluation stops at the first error; assignments made by earlier
    /// statements are kept.
    ///
    /// # Errors
    /// The first evaluation error, positioned at the failing token.
    pub fn evaluate(&mut self, statements: &[Statement]) -> EvalResult<Vec<Token>> {
        let mut results = Vec::new();
        for statement in statements {
            match statement {
                Statement::Expression(expression) => results.push(self.execute(expression)?),
                Statement::ForLoop(for_loop) => self.execute_for_loop(for_loop)?,
            }
        }
        Ok(results)
    }

    /// Executes one expression statement.
    ///
    /// # Errors
    /// The first evaluation error, positioned at the failing token.
    pub fn execute(&mut self, expression: &Expression) -> EvalResult<Token> {
        if self.current_layer() == ScopeLayer::Random
           && let Some((name, argument)) = shuffle_definition(&expression.body)
        {
            return self.define_permutation(name, argument)
                       .map_err(|e| e.at(expression.position));
        }

        self.execute_rpn(&expression.body)
            .map_err(|e| e.at(expression.position))
    }

    /// Runs an RPN sequence and returns the resolved value left on the
    /// stack.
    pub(crate) fn execute_rpn(&mut self, body: &[Token]) -> EvalResult<Token> {
        let mut stack: Vec<Operand> = Vec::new();

        for token in body {
            self.execute_token(token, &mut stack)
                .map_err(|e| e.at(token.position()))?;
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(Operand::Value(result)), true) => self.resolve(&result),
            _ => Err(EvaluationErrorKind::CorruptedStack.into()),
        }
    }

    fn execute_token(&mut self, token: &Token, stack: &mut Vec<Operand>) -> EvalResult<()> {
        let result = match token.kind() {
            TokenType::Number | TokenType::String | TokenType::Variable | TokenType::Constant => {
                stack.push(Operand::Value(token.clone()));
                return Ok(());
            },
            TokenType::Function => {
                let count = pop_count(stack)?;
                let args = self.pop_values(stack, count)?;
                self.call_function(token.as_str().unwrap_or_default(), &args)?
            },
            TokenType::Operator => match token.as_str().unwrap_or_default() {
                "=" => {
                    let value = self.pop_value(stack)?;
                    let target = pop_raw(stack)?;
                    match (target.kind(), target.as_str()) {
                        (TokenType::Variable, Some(name)) => self.assign(name, value)?,
                        _ => {
                            return Err(EvaluationErrorKind::InvalidOperand { operator: "=".to_string(),
                                                                             found:    target.describe(), }.into());
                        },
                    }
                },
                symbol @ (NEGATION | "!" | "~") => {
                    let operand = self.pop_value(stack)?;
                    Self::eval_unary(symbol, &operand)?
                },
                TERNARY => {
                    let otherwise = self.pop_value(stack)?;
                    let then = self.pop_value(stack)?;
                    let condition = self.pop_value(stack)?;
                    if expect_number(&condition)? != 0.0 { then } else { otherwise }
                },
                RANGE_BUILD => {
                    let count = pop_count(stack)?;
                    let parts = self.pop_values(stack, count)?;
                    stack.push(Operand::Range(Self::build_range(&parts)?));
                    return Ok(());
                },
                SET_BUILD => {
                    let count = pop_count(stack)?;
                    let elements = self.pop_operands(stack, count)?;
                    Self::build_set(elements)?
                },
                ARRAY_BUILD => {
                    let count = pop_count(stack)?;
                    let elements = self.pop_operands(stack, count)?;
                    Self::build_list(elements)?
                },
                INDEX => {
                    let index = self.pop_value(stack)?;
                    let collection = self.pop_value(stack)?;
                    Self::eval_index(&collection, &index)?
                },
                symbol => {
                    let right = self.pop_value(stack)?;
                    let left = self.pop_value(stack)?;
                    Self::eval_binary(symbol, &left, &right)?
                },
            },
            _ => return Err(EvaluationErrorKind::UnexpectedToken { value: token.to_string() }.into()),
        };

        stack.push(Operand::Value(check_finite(result.with_position(token.position()))?));
        Ok(())
    }

    /// Replaces variables by their values and constants by their numbers.
    ///
    /// # Errors
    /// `UnknownVariable`, `AlgebraicVariable` or
    /// `UninstantiatedRandomVariable`.
    pub fn resolve(&self, token: &Token) -> EvalResult<Token> {
        match token.kind() {
            TokenType::Variable => {
                let name = token.as_str().unwrap_or_default();
                match self.get_variable(name) {
                    Some(variable) if variable.kind == VariableType::Algebraic => {
                        Err(EvaluationErrorKind::AlgebraicVariable { name: name.to_string() }.into())
                    },
                    Some(variable) => Ok(variable.value.clone().with_position(token.position())),
                    None if self.random_variables.iter().any(|rv| rv.name() == name) => {
                        Err(EvaluationErrorKind::UninstantiatedRandomVariable { name: name.to_string() }.into())
                    },
                    None => Err(EvaluationErrorKind::UnknownVariable { name: name.to_string() }.into()),
                }
            },
            TokenType::Constant => Ok(Token::number(std::f64::consts::PI, token.position())),
            _ => Ok(token.clone()),
        }
    }

    fn pop_value(&self, stack: &mut Vec<Operand>) -> EvalResult<Token> {
        self.resolve(&pop_raw(stack)?)
    }

    /// Pops `count` values, returning them in their original order.
    fn pop_values(&self, stack: &mut Vec<Operand>, count: usize) -> EvalResult<Vec<Token>> {
        let mut values = (0..count).map(|_| self.pop_value(stack))
                                   .collect::<EvalResult<Vec<_>>>()?;
        values.reverse();
        Ok(values)
    }

    /// Pops `count` operands, which may include ranges, in original order.
    fn pop_operands(&self, stack: &mut Vec<Operand>, count: usize) -> EvalResult<Vec<Operand>> {
        let mut operands = Vec::with_capacity(count);
        for _ in 0..count {
            match stack.pop() {
                Some(Operand::Value(token)) => operands.push(Operand::Value(self.resolve(&token)?)),
                Some(range @ Operand::Range(_)) => operands.push(range),
                None => return Err(EvaluationErrorKind::CorruptedStack.into()),
            }
        }
        operands.reverse();
        Ok(operands)
    }
}

fn pop_raw(stack: &mut Vec<Operand>) -> EvalResult<Token> {
    match stack.pop() {
        Some(Operand::Value(token)) => Ok(token),
        Some(Operand::Range(_)) => {
            Err(EvaluationErrorKind::InvalidRange { details: "Ranges can only be used inside sets and lists.".to_string() }.into())
        },
        None => Err(EvaluationErrorKind::CorruptedStack.into()),
    }
}

fn pop_count(stack: &mut Vec<Operand>) -> EvalResult<usize> {
    let token = pop_raw(stack)?;
    let count = token.as_number()
                     .ok_or(EvaluationErrorKind::CorruptedStack)
                     .and_then(f64_to_u64_checked)?;
    usize::try_from(count).map_err(|_| EvaluationErrorKind::CorruptedStack.into())
}

/// Recognizes `name = shuffle(argument)` and returns the name and the RPN of
/// the argument.
fn shuffle_definition(body: &[Token]) -> Option<(&str, &[Token])> {
    let [target, argument @ .., count, function, assign] = body else {
        return None;
    };

    let matches = target.kind() == TokenType::Variable
                  && assign.is_operator("=")
                  && function.kind() == TokenType::Function
                  && function.as_str() == Some("shuffle")
                  && count.as_number() == Some(1.0)
                  && !argument.is_empty();

    matches.then(|| (target.as_str().unwrap_or_default(), argument))
}
