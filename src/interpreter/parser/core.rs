use std::collections::HashSet;

use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    interpreter::{
        evaluator::function::core::is_builtin_function,
        input_stream::Position,
        lexer::Lexer,
        parser::{
            shunting_yard::to_rpn,
            statement::{Expression, ForLoop, Statement},
            utils::{SourceText, check_balance, classify_identifiers, insert_implicit_multiplication},
        },
        token::{Token, TokenType},
    },
};

/// Result type used by the lexer and the parser.
///
/// All parsing functions return either a value of type `T` or a
/// `SyntaxError` pointing at the offending input.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Parses a text into statements of RPN tokens.
///
/// Statements are separated by `;`. Parsing stops at the first error; there
/// are no partial results.
///
/// # Example
/// ```
/// use qformula::interpreter::parser::core::Parser;
///
/// let parser = Parser::new("a = 2; b = a ^ 2", &[]).unwrap();
/// assert_eq!(parser.statements().len(), 2);
/// assert_eq!(parser.statements()[1].source(), "b = a ^ 2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parser {
    statements:      Vec<Statement>,
    known_variables: HashSet<String>,
}

impl Parser {
    /// Parses `text`. Names in `known_variables` are always treated as
    /// variables, even where they would otherwise be read as a function.
    ///
    /// # Errors
    /// The first lexical or syntax error in the text.
    pub fn new(text: &str, known_variables: &[&str]) -> ParseResult<Self> {
        let known_variables = known_variables.iter().map(ToString::to_string).collect::<HashSet<_>>();
        let tokens = Lexer::new(text).tokenize()?;
        let source = SourceText::new(text);

        let mut reader = StatementReader { tokens: &tokens,
                                           index:  0,
                                           source: &source,
                                           known:  &known_variables, };
        let statements = reader.read_block(false)?;

        Ok(Self { statements,
                  known_variables })
    }

    /// The parsed statements in source order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Consumes the parser, returning its statements.
    #[must_use]
    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    /// The names that were declared as known variables.
    #[must_use]
    pub const fn known_variables(&self) -> &HashSet<String> {
        &self.known_variables
    }

    /// Returns `true` if any statement refers to a variable.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        fn uses_variables(statement: &Statement) -> bool {
            match statement {
                Statement::Expression(expression) => {
                    expression.body.iter().any(|t| t.kind() == TokenType::Variable)
                },
                Statement::ForLoop(_) => true,
            }
        }
        self.statements.iter().any(uses_variables)
    }
}

/// Compiles the tokens of one expression statement into RPN.
///
/// # Errors
/// Any syntax error found while checking delimiters, resolving identifiers
/// or converting to RPN.
pub fn compile_expression(tokens: &[Token], known_variables: &HashSet<String>) -> ParseResult<Vec<Token>> {
    check_balance(tokens)?;
    let classified = classify_identifiers(tokens, known_variables)?;
    to_rpn(&insert_implicit_multiplication(classified))
}

struct StatementReader<'a> {
    tokens: &'a [Token],
    index:  usize,
    source: &'a SourceText,
    known:  &'a HashSet<String>,
}

impl StatementReader<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next_position(&self) -> Option<Position> {
        self.peek().map(Token::position)
    }

    /// Reads statements until the end of input or, inside a loop body, until
    /// the closing brace, which is left unconsumed.
    fn read_block(&mut self, in_block: bool) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();

        loop {
            while self.peek().is_some_and(|t| t.kind() == TokenType::EndOfStatement) {
                self.index += 1;
            }

            match self.peek() {
                None => break,
                Some(token) if in_block && token.kind() == TokenType::ClosingBrace => break,
                Some(token) if token.kind() == TokenType::ReservedWord && token.as_str() == Some("for") => {
                    statements.push(self.read_for_loop(in_block)?);
                },
                Some(_) => statements.push(Statement::Expression(self.read_expression(in_block)?)),
            }
        }

        Ok(statements)
    }

    /// Collects the tokens up to the next `;` (consumed) or, inside a loop
    /// body, up to an unmatched `}` (not consumed).
    fn read_expression(&mut self, in_block: bool) -> ParseResult<Expression> {
        let start = self.index;
        let mut depth = 0usize;

        while let Some(token) = self.peek() {
            match token.kind() {
                TokenType::EndOfStatement => break,
                TokenType::OpeningParen | TokenType::OpeningBracket | TokenType::OpeningBrace => depth += 1,
                TokenType::ClosingBrace if in_block && depth == 0 => break,
                TokenType::ClosingParen | TokenType::ClosingBracket | TokenType::ClosingBrace => {
                    depth = depth.saturating_sub(1);
                },
                _ => {},
            }
            self.index += 1;
        }

        let all: &[Token] = self.tokens;
        let tokens = &all[start..self.index];
        let end = self.next_position();
        if self.peek().is_some_and(|t| t.kind() == TokenType::EndOfStatement) {
            self.index += 1;
        }

        self.expression(tokens, end)
    }

    fn expression(&self, tokens: &[Token], end: Option<Position>) -> ParseResult<Expression> {
        let position = tokens.first().map(Token::position).unwrap_or_default();
        let body = compile_expression(tokens, self.known)?;

        Ok(Expression { body,
                        source: self.source.slice(position, end),
                        position })
    }

    fn expect(&mut self, kind: TokenType, details: &str) -> ParseResult<Token> {
        match self.peek() {
            Some(token) if token.kind() == kind => {
                let token = token.clone();
                self.index += 1;
                Ok(token)
            },
            Some(token) => Err(SyntaxError::new(SyntaxErrorKind::InvalidForLoop { details: details.to_string() },
                                                token.position())),
            None => {
                let position = self.tokens.last().map(Token::position).unwrap_or_default();
                Err(SyntaxError::new(SyntaxErrorKind::InvalidForLoop { details: details.to_string() }, position))
            },
        }
    }

    /// Reads `for (v : iterable) { ... }` or `for (v : iterable) statement`.
    fn read_for_loop(&mut self, in_block: bool) -> ParseResult<Statement> {
        let keyword = self.expect(TokenType::ReservedWord, "expected 'for'.")?;
        let opening = self.expect(TokenType::OpeningParen, "expected '(' after 'for'.")?;
        let variable = self.expect(TokenType::Identifier, "expected a loop variable.")?;
        let name = variable.as_str().unwrap_or_default().to_string();

        if !self.known.contains(&name) && (name == "pi" || is_builtin_function(&name)) {
            return Err(SyntaxError::new(SyntaxErrorKind::AssignmentToReserved { name }, variable.position()));
        }
        if !self.peek().is_some_and(|t| t.is_operator(":")) {
            return Err(SyntaxError::new(SyntaxErrorKind::InvalidForLoop { details: "expected ':' after the loop variable.".to_string() },
                                        self.next_position().unwrap_or_else(|| variable.position())));
        }
        self.index += 1;

        let iterable_start = self.index;
        let mut depth = 0usize;
        loop {
            let Some(token) = self.peek() else {
                return Err(SyntaxError::new(SyntaxErrorKind::UnclosedParenthesis { opening: '(' }, opening.position()));
            };
            match token.kind() {
                TokenType::OpeningParen | TokenType::OpeningBracket | TokenType::OpeningBrace => depth += 1,
                TokenType::ClosingParen | TokenType::ClosingBracket | TokenType::ClosingBrace if depth > 0 => depth -= 1,
                TokenType::ClosingParen => break,
                TokenType::EndOfStatement => {
                    return Err(SyntaxError::new(SyntaxErrorKind::UnclosedParenthesis { opening: '(' }, opening.position()));
                },
                _ => {},
            }
            self.index += 1;
        }
        let all: &[Token] = self.tokens;
        let iterable_tokens = &all[iterable_start..self.index];
        if iterable_tokens.is_empty() {
            return Err(SyntaxError::new(SyntaxErrorKind::InvalidForLoop { details: "missing the values to iterate over.".to_string() },
                                        opening.position()));
        }
        let iterable = self.expression(iterable_tokens, self.next_position())?;
        self.index += 1;

        let body = match self.peek() {
            Some(token) if token.kind() == TokenType::OpeningBrace => {
                let brace = token.clone();
                self.index += 1;
                let body = self.read_block(true)?;
                if self.peek().is_none() {
                    return Err(SyntaxError::new(SyntaxErrorKind::UnclosedParenthesis { opening: '{' }, brace.position()));
                }
                self.index += 1;
                body
            },
            Some(token) if token.kind() == TokenType::ReservedWord => vec![self.read_for_loop(in_block)?],
            Some(token) if token.kind() != TokenType::EndOfStatement => {
                vec![Statement::Expression(self.read_expression(in_block)?)]
            },
            _ => {
                return Err(SyntaxError::new(SyntaxErrorKind::InvalidForLoop { details: "missing the loop body.".to_string() },
                                            keyword.position()));
            },
        };

        Ok(Statement::ForLoop(ForLoop { variable: name,
                                        iterable,
                                        body,
                                        source: self.source.slice(keyword.position(), self.next_position()),
                                        position: keyword.position() }))
    }
}
