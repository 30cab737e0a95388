use std::collections::HashSet;

use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    interpreter::{
        evaluator::function::core::is_builtin_function,
        input_stream::Position,
        parser::{core::ParseResult, shunting_yard::closing_for},
        token::{Token, TokenType},
    },
};

/// Checks that all delimiters in one statement are balanced and properly
/// nested.
///
/// Mismatched and unclosed delimiters are reported at the opening
/// delimiter; a stray closing delimiter is reported at its own position.
///
/// # Errors
/// `MismatchedParentheses`, `UnclosedParenthesis` or `StrayParenthesis`.
pub fn check_balance(tokens: &[Token]) -> ParseResult<()> {
    let mut open: Vec<&Token> = Vec::new();

    for token in tokens {
        match token.kind() {
            TokenType::OpeningParen | TokenType::OpeningBracket | TokenType::OpeningBrace => open.push(token),
            TokenType::ClosingParen | TokenType::ClosingBracket | TokenType::ClosingBrace => {
                let closing = delimiter_char(token);
                let Some(opening) = open.pop() else {
                    return Err(SyntaxError::new(SyntaxErrorKind::StrayParenthesis { closing }, token.position()));
                };
                if closing_for(opening.kind()) != Some(token.kind()) {
                    return Err(SyntaxError::new(SyntaxErrorKind::MismatchedParentheses { opening: delimiter_char(opening),
                                                                                         closing },
                                                opening.position()));
                }
            },
            _ => {},
        }
    }

    match open.pop() {
        Some(opening) => {
            Err(SyntaxError::new(SyntaxErrorKind::UnclosedParenthesis { opening: delimiter_char(opening) },
                                 opening.position()))
        },
        None => Ok(()),
    }
}

fn delimiter_char(token: &Token) -> char {
    token.as_str().and_then(|s| s.chars().next()).unwrap_or(' ')
}

/// Returns `true` if the token is the given punctuation or operator.
fn is_symbol(token: Option<&Token>, kind: TokenType, symbol: &str) -> bool {
    token.is_some_and(|t| t.kind() == kind && t.as_str() == Some(symbol))
}

/// Resolves identifiers into variables, functions and constants.
///
/// The rules, in order of priority:
/// - after a `\` prefix the name must be a builtin function called with
///   parentheses;
/// - names in `known_variables` are always variables, even if they shadow a
///   builtin function;
/// - `pi` is the constant, or the function when called as `pi()`;
/// - builtin function names must be followed by `(`;
/// - everything else is a variable.
///
/// # Errors
/// `InvalidPrefix`, `UnknownFunction`, `FunctionWithoutParentheses` and
/// `AssignmentToReserved`.
pub fn classify_identifiers(tokens: &[Token], known_variables: &HashSet<String>) -> ParseResult<Vec<Token>> {
    let mut classified = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let next = tokens.get(i + 1);

        match token.kind() {
            TokenType::Prefix => {
                let Some(name_token) = next.filter(|t| t.kind() == TokenType::Identifier) else {
                    return Err(SyntaxError::new(SyntaxErrorKind::InvalidPrefix, token.position()));
                };
                let name = name_token.as_str().unwrap_or_default();
                let called = is_symbol(tokens.get(i + 2), TokenType::OpeningParen, "(");

                if !called {
                    return Err(SyntaxError::new(SyntaxErrorKind::InvalidPrefix, token.position()));
                }
                if !is_builtin_function(name) && name != "pi" {
                    return Err(SyntaxError::new(SyntaxErrorKind::UnknownFunction { name: name.to_string() },
                                                name_token.position()));
                }

                classified.push(name_token.clone().with_kind(TokenType::Function));
                i += 2;
                continue;
            },
            TokenType::Identifier => classified.push(classify_name(token, next, known_variables)?),
            TokenType::Constant if is_symbol(next, TokenType::Operator, "=") => {
                return Err(SyntaxError::new(SyntaxErrorKind::AssignmentToReserved { name: token.to_string() },
                                            token.position()));
            },
            _ => classified.push(token.clone()),
        }
        i += 1;
    }

    Ok(classified)
}

fn classify_name(token: &Token, next: Option<&Token>, known_variables: &HashSet<String>) -> ParseResult<Token> {
    let name = token.as_str().unwrap_or_default();

    if known_variables.contains(name) {
        return Ok(token.clone().with_kind(TokenType::Variable));
    }

    let reserved = name == "pi" || is_builtin_function(name);
    if reserved && is_symbol(next, TokenType::Operator, "=") {
        return Err(SyntaxError::new(SyntaxErrorKind::AssignmentToReserved { name: name.to_string() },
                                    token.position()));
    }

    let called = is_symbol(next, TokenType::OpeningParen, "(");
    let kind = match name {
        "pi" if called => TokenType::Function,
        "pi" => TokenType::Constant,
        _ if is_builtin_function(name) && called => TokenType::Function,
        _ if is_builtin_function(name) => {
            return Err(SyntaxError::new(SyntaxErrorKind::FunctionWithoutParentheses { name: name.to_string() },
                                        token.position()));
        },
        _ => TokenType::Variable,
    };

    Ok(token.clone().with_kind(kind))
}

/// Inserts the `*` operator between adjacent operands, so that `3x`,
/// `2(a+b)` and `sin(x)cos(x)` read as products.
///
/// A number never starts an implicit product: `2 3` stays an error rather
/// than silently becoming `6`. A `[` after a variable or a closing delimiter
/// is indexing, not multiplication.
#[must_use]
pub fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        if let Some(previous) = result.last()
           && ends_operand(previous.kind())
           && starts_factor(token.kind())
        {
            result.push(Token::text(TokenType::Operator, "*", token.position()));
        }
        result.push(token);
    }

    result
}

const fn ends_operand(kind: TokenType) -> bool {
    matches!(kind,
             TokenType::Number
             | TokenType::Variable
             | TokenType::Constant
             | TokenType::ClosingParen
             | TokenType::ClosingBracket
             | TokenType::ClosingBrace)
}

const fn starts_factor(kind: TokenType) -> bool {
    matches!(kind,
             TokenType::Variable | TokenType::Constant | TokenType::Function | TokenType::OpeningParen)
}

/// The original text split into rows, for cutting out the source of a
/// statement by token positions.
#[derive(Debug, Clone)]
pub struct SourceText {
    chars:      Vec<char>,
    row_starts: Vec<usize>,
}

impl SourceText {
    /// Indexes the rows of `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut row_starts = vec![0];
        row_starts.extend(chars.iter()
                               .enumerate()
                               .filter(|(_, c)| **c == '\n')
                               .map(|(i, _)| i + 1));
        Self { chars, row_starts }
    }

    fn offset(&self, position: Position) -> usize {
        let row_start = self.row_starts
                            .get(position.row.saturating_sub(1))
                            .copied()
                            .unwrap_or(self.chars.len());
        (row_start + position.column).min(self.chars.len())
    }

    /// Returns the trimmed text from `start` up to `end`, or up to the end of
    /// the input when `end` is `None`.
    #[must_use]
    pub fn slice(&self, start: Position, end: Option<Position>) -> String {
        let from = self.offset(start);
        let to = end.map_or(self.chars.len(), |end| self.offset(end)).max(from);

        self.chars[from..to].iter()
                            .collect::<String>()
                            .trim()
                            .trim_end_matches(';')
                            .trim_end()
                            .to_string()
    }
}
