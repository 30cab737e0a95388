use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    interpreter::{
        input_stream::Position,
        parser::core::ParseResult,
        token::{Token, TokenType},
    },
    util::num::{f64_to_u64_checked, usize_to_f64},
};

/// Unary minus in RPN output.
pub const NEGATION: &str = "_";
/// Marker pushed at `?` until the matching `:` is seen.
pub const TERNARY_SENTINEL: &str = "%%ternary-sentinel";
/// Ternary operator, pops condition, then-value and else-value.
pub const TERNARY: &str = "%%ternary";
/// Builds a range from the preceding count of parts (2 or 3).
pub const RANGE_BUILD: &str = "%%rangebuild";
/// Builds a set from the preceding count of elements.
pub const SET_BUILD: &str = "%%setbuild";
/// Builds a list from the preceding count of elements.
pub const ARRAY_BUILD: &str = "%%arraybuild";
/// Indexing, pops the collection and the index.
pub const INDEX: &str = "[]";

const UNARY_PRECEDENCE: u8 = 70;
const TERNARY_PRECEDENCE: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    Left,
    Right,
}

struct OperatorInfo {
    symbol:        &'static str,
    precedence:    u8,
    associativity: Associativity,
}

static BINARY_OPERATORS: &[OperatorInfo] = &[
    OperatorInfo { symbol: "^",  precedence: 80, associativity: Associativity::Right },
    OperatorInfo { symbol: "**", precedence: 80, associativity: Associativity::Right },
    OperatorInfo { symbol: "*",  precedence: 60, associativity: Associativity::Left },
    OperatorInfo { symbol: "/",  precedence: 60, associativity: Associativity::Left },
    OperatorInfo { symbol: "%",  precedence: 60, associativity: Associativity::Left },
    OperatorInfo { symbol: "+",  precedence: 50, associativity: Associativity::Left },
    OperatorInfo { symbol: "-",  precedence: 50, associativity: Associativity::Left },
    OperatorInfo { symbol: "<<", precedence: 45, associativity: Associativity::Left },
    OperatorInfo { symbol: ">>", precedence: 45, associativity: Associativity::Left },
    OperatorInfo { symbol: "<",  precedence: 40, associativity: Associativity::Left },
    OperatorInfo { symbol: ">",  precedence: 40, associativity: Associativity::Left },
    OperatorInfo { symbol: "<=", precedence: 40, associativity: Associativity::Left },
    OperatorInfo { symbol: ">=", precedence: 40, associativity: Associativity::Left },
    OperatorInfo { symbol: "==", precedence: 35, associativity: Associativity::Left },
    OperatorInfo { symbol: "!=", precedence: 35, associativity: Associativity::Left },
    OperatorInfo { symbol: "&",  precedence: 32, associativity: Associativity::Left },
    OperatorInfo { symbol: "|",  precedence: 30, associativity: Associativity::Left },
    OperatorInfo { symbol: "&&", precedence: 25, associativity: Associativity::Left },
    OperatorInfo { symbol: "||", precedence: 20, associativity: Associativity::Left },
    OperatorInfo { symbol: "=",  precedence: 10, associativity: Associativity::Right },
];

fn binary_operator(symbol: &str) -> Option<&'static OperatorInfo> {
    BINARY_OPERATORS.iter().find(|op| op.symbol == symbol)
}

/// Returns `true` for the binary operators understood by the evaluator.
#[must_use]
pub fn is_binary_operator(symbol: &str) -> bool {
    binary_operator(symbol).is_some()
}

/// Binding strength of an operator or opcode as it appears in RPN output.
#[must_use]
pub fn precedence(symbol: &str) -> Option<u8> {
    match symbol {
        NEGATION | "!" | "~" => Some(UNARY_PRECEDENCE),
        TERNARY => Some(TERNARY_PRECEDENCE),
        _ => binary_operator(symbol).map(|op| op.precedence),
    }
}

#[derive(Debug)]
enum GroupKind {
    Paren,
    Call(Token),
    Index,
    List,
    Set,
}

#[derive(Debug)]
struct Group {
    kind:     GroupKind,
    opening:  Token,
    elements: usize,
    colons:   usize,
}

#[derive(Debug)]
enum Pending {
    Operator {
        token:         Token,
        precedence:    u8,
        associativity: Associativity,
    },
    Sentinel(Token),
    Group(Group),
}

/// Converts a classified infix token sequence of one statement into RPN.
///
/// The input must already have identifiers resolved into `VARIABLE`,
/// `FUNCTION` and `CONSTANT` tokens and implicit multiplications made
/// explicit. Function calls and literals are encoded with a preceding
/// `NUMBER` token holding the argument or element count:
///
/// | infix        | RPN                               |
/// |--------------|-----------------------------------|
/// | `-a`         | `a _`                             |
/// | `f(a, b)`    | `a b 2 f`                         |
/// | `[a, b]`     | `a b 2 %%arraybuild`              |
/// | `{a, b:c}`   | `a b c 2 %%rangebuild 2 %%setbuild` |
/// | `a ? b : c`  | `a b c %%ternary`                 |
/// | `a[i]`       | `a i []`                          |
///
/// # Errors
/// A positioned `SyntaxError` for missing operands or operators, misplaced
/// separators, unpaired `?`/`:` and delimiters, and `Unexpected token` for
/// tokens that have no place in an expression.
///
/// # Example
/// ```
/// use qformula::interpreter::{lexer::Lexer, parser::shunting_yard::to_rpn};
///
/// let tokens = Lexer::new("3+10^4").tokenize().unwrap();
/// let rpn = to_rpn(&tokens).unwrap();
/// let rendered = rpn.iter().map(ToString::to_string).collect::<Vec<_>>();
/// assert_eq!(rendered, ["3", "10", "4", "^", "+"]);
/// ```
pub fn to_rpn(tokens: &[Token]) -> ParseResult<Vec<Token>> {
    Converter::default().run(tokens)
}

#[derive(Debug, Default)]
struct Converter {
    output:         Vec<Token>,
    stack:          Vec<Pending>,
    expect_operand: bool,
    previous:       Option<Token>,
}

impl Converter {
    fn run(mut self, tokens: &[Token]) -> ParseResult<Vec<Token>> {
        self.expect_operand = true;

        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            match token.kind() {
                TokenType::Number | TokenType::String | TokenType::Constant | TokenType::Variable => {
                    self.operand(token)?;
                },
                TokenType::Function => {
                    self.require_operand_position(token)?;
                    match iter.next() {
                        Some(paren) if paren.kind() == TokenType::OpeningParen => {
                            self.open(GroupKind::Call(token.clone()), paren);
                            self.previous = Some(paren.clone());
                            continue;
                        },
                        _ => {
                            return Err(SyntaxError::new(SyntaxErrorKind::FunctionWithoutParentheses { name: token.to_string() },
                                                        token.position()));
                        },
                    }
                },
                TokenType::OpeningParen => {
                    self.require_operand_position(token)?;
                    self.open(GroupKind::Paren, token);
                },
                TokenType::OpeningBracket => {
                    let kind = if self.expect_operand { GroupKind::List } else { GroupKind::Index };
                    self.open(kind, token);
                },
                TokenType::OpeningBrace => {
                    self.require_operand_position(token)?;
                    self.open(GroupKind::Set, token);
                },
                TokenType::ClosingParen | TokenType::ClosingBracket | TokenType::ClosingBrace => self.close(token)?,
                TokenType::ArgSeparator => self.separator(token)?,
                TokenType::RangeSeparator => self.range_separator(token)?,
                TokenType::Operator => self.operator(token)?,
                _ => return Err(unexpected(token)),
            }
            self.previous = Some(token.clone());
        }

        self.finish()
    }

    fn operand(&mut self, token: &Token) -> ParseResult<()> {
        self.require_operand_position(token)?;
        self.output.push(token.clone());
        self.expect_operand = false;
        Ok(())
    }

    fn require_operand_position(&self, token: &Token) -> ParseResult<()> {
        if self.expect_operand {
            Ok(())
        } else {
            Err(SyntaxError::new(SyntaxErrorKind::MissingOperator { value: token.to_string() }, token.position()))
        }
    }

    fn open(&mut self, kind: GroupKind, opening: &Token) {
        self.stack.push(Pending::Group(Group { kind,
                                               opening: opening.clone(),
                                               elements: 0,
                                               colons: 0 }));
        self.expect_operand = true;
    }

    /// Error for a place where an operand is missing, reported at the token
    /// that should have been followed by one.
    fn missing_operand(&self, at: &Token) -> SyntaxError {
        match &self.previous {
            Some(previous) if previous.kind() == TokenType::ArgSeparator => {
                SyntaxError::new(SyntaxErrorKind::UnexpectedSeparator { separator: ',' }, previous.position())
            },
            Some(previous) if previous.kind() == TokenType::Operator || previous.kind() == TokenType::RangeSeparator => {
                SyntaxError::new(SyntaxErrorKind::MissingOperand { operator: previous.to_string() },
                                 previous.position())
            },
            _ => SyntaxError::new(SyntaxErrorKind::EmptyExpression, at.position()),
        }
    }

    /// Moves operators to the output until a group or sentinel is on top.
    fn pop_operators(&mut self) {
        while let Some(Pending::Operator { .. }) = self.stack.last() {
            if let Some(Pending::Operator { token, .. }) = self.stack.pop() {
                self.output.push(token);
            }
        }
    }

    /// Finishes the current element of the innermost group.
    fn finish_element(&mut self, at: &Token) -> ParseResult<()> {
        if self.expect_operand {
            return Err(self.missing_operand(at));
        }
        self.pop_operators();

        match self.stack.last_mut() {
            Some(Pending::Group(group)) => {
                if group.colons > 0 {
                    let parts = group.colons + 1;
                    if parts > 3 {
                        return Err(SyntaxError::new(SyntaxErrorKind::InvalidRange, group.opening.position()));
                    }
                    let position = group.opening.position();
                    group.colons = 0;
                    group.elements += 1;
                    self.output.push(count_token(parts, position));
                    self.output.push(Token::text(TokenType::Operator, RANGE_BUILD, position));
                } else {
                    group.elements += 1;
                }
                Ok(())
            },
            Some(Pending::Sentinel(sentinel)) => {
                Err(SyntaxError::new(SyntaxErrorKind::QuestionWithoutColon, sentinel.position()))
            },
            _ => Err(SyntaxError::new(SyntaxErrorKind::UnexpectedSeparator { separator: ',' }, at.position())),
        }
    }

    fn separator(&mut self, token: &Token) -> ParseResult<()> {
        if self.expect_operand {
            return Err(SyntaxError::new(SyntaxErrorKind::UnexpectedSeparator { separator: ',' }, token.position()));
        }
        self.finish_element(token)?;

        if let Some(Pending::Group(group)) = self.stack.last()
           && matches!(group.kind, GroupKind::Paren | GroupKind::Index)
        {
            return Err(SyntaxError::new(SyntaxErrorKind::UnexpectedSeparator { separator: ',' }, token.position()));
        }

        self.expect_operand = true;
        Ok(())
    }

    fn close(&mut self, token: &Token) -> ParseResult<()> {
        let closing = token.to_string().chars().next().unwrap_or(')');
        if !self.stack.iter().any(|pending| matches!(pending, Pending::Group(_))) {
            return Err(SyntaxError::new(SyntaxErrorKind::StrayParenthesis { closing }, token.position()));
        }

        let empty_group = self.expect_operand
                          && matches!(&self.previous, Some(previous) if is_opening(previous.kind()));
        if !empty_group {
            self.finish_element(token)?;
        }

        let Some(Pending::Group(group)) = self.stack.pop() else {
            return Err(SyntaxError::new(SyntaxErrorKind::StrayParenthesis { closing }, token.position()));
        };

        let opening = group.opening.to_string().chars().next().unwrap_or('(');
        if closing_for(group.opening.kind()) != Some(token.kind()) {
            return Err(SyntaxError::new(SyntaxErrorKind::MismatchedParentheses { opening, closing },
                                        group.opening.position()));
        }

        let position = group.opening.position();
        match group.kind {
            GroupKind::Paren | GroupKind::Index if group.elements == 0 => {
                return Err(SyntaxError::new(SyntaxErrorKind::EmptyExpression, position));
            },
            GroupKind::Paren => {},
            GroupKind::Index => self.output.push(Token::text(TokenType::Operator, INDEX, position)),
            GroupKind::Call(function) => {
                self.output.push(count_token(group.elements, position));
                self.output.push(function);
            },
            GroupKind::List => {
                self.output.push(count_token(group.elements, position));
                self.output.push(Token::text(TokenType::Operator, ARRAY_BUILD, position));
            },
            GroupKind::Set => {
                self.output.push(count_token(group.elements, position));
                self.output.push(Token::text(TokenType::Operator, SET_BUILD, position));
            },
        }

        self.expect_operand = false;
        Ok(())
    }

    fn range_separator(&mut self, token: &Token) -> ParseResult<()> {
        if self.expect_operand {
            return Err(self.missing_operand(token));
        }
        self.pop_operators();

        match self.stack.last_mut() {
            Some(Pending::Group(group)) if matches!(group.kind, GroupKind::List | GroupKind::Set) => {
                group.colons += 1;
                self.expect_operand = true;
                Ok(())
            },
            _ => Err(SyntaxError::new(SyntaxErrorKind::ColonWithoutQuestion, token.position())),
        }
    }

    fn operator(&mut self, token: &Token) -> ParseResult<()> {
        let symbol = token.as_str().unwrap_or_default();

        if self.expect_operand {
            let unary = match symbol {
                "-" => NEGATION,
                "!" => "!",
                "~" => "~",
                "+" => return Ok(()),
                _ => return Err(self.missing_operand_before(token)),
            };
            self.stack.push(Pending::Operator { token:         Token::text(TokenType::Operator, unary, token.position()),
                                                precedence:    UNARY_PRECEDENCE,
                                                associativity: Associativity::Right, });
            return Ok(());
        }

        match symbol {
            "?" => {
                self.pop_while(TERNARY_PRECEDENCE, Associativity::Right);
                self.stack.push(Pending::Sentinel(Token::text(TokenType::Operator, TERNARY_SENTINEL, token.position())));
            },
            ":" => {
                self.pop_operators();
                if let Some(Pending::Sentinel(sentinel)) = self.stack.last() {
                    let resolved = Token::text(TokenType::Operator, TERNARY, sentinel.position());
                    self.stack.pop();
                    self.stack.push(Pending::Operator { token:         resolved,
                                                        precedence:    TERNARY_PRECEDENCE,
                                                        associativity: Associativity::Right, });
                } else {
                    return self.range_separator(token);
                }
            },
            _ => {
                let info = binary_operator(symbol).ok_or_else(|| unexpected(token))?;
                self.pop_while(info.precedence, info.associativity);
                self.stack.push(Pending::Operator { token:         token.clone(),
                                                    precedence:    info.precedence,
                                                    associativity: info.associativity, });
            },
        }

        self.expect_operand = true;
        Ok(())
    }

    fn missing_operand_before(&self, token: &Token) -> SyntaxError {
        match &self.previous {
            Some(previous) if previous.kind() == TokenType::Operator => {
                SyntaxError::new(SyntaxErrorKind::MissingOperand { operator: previous.to_string() },
                                 previous.position())
            },
            _ => SyntaxError::new(SyntaxErrorKind::MissingOperand { operator: token.to_string() }, token.position()),
        }
    }

    /// Pops operators that bind at least as tightly as an incoming operator.
    fn pop_while(&mut self, precedence: u8, associativity: Associativity) {
        while let Some(Pending::Operator { precedence: top, .. }) = self.stack.last() {
            let pops = *top > precedence || (*top == precedence && associativity == Associativity::Left);
            if !pops {
                break;
            }
            if let Some(Pending::Operator { token, .. }) = self.stack.pop() {
                self.output.push(token);
            }
        }
    }

    fn finish(mut self) -> ParseResult<Vec<Token>> {
        if self.expect_operand {
            let error = match &self.previous {
                Some(previous) => self.missing_operand(previous),
                None => SyntaxError::new(SyntaxErrorKind::EmptyExpression, Position::default()),
            };
            return Err(error);
        }

        while let Some(pending) = self.stack.pop() {
            match pending {
                Pending::Operator { token, .. } => self.output.push(token),
                Pending::Sentinel(sentinel) => {
                    return Err(SyntaxError::new(SyntaxErrorKind::QuestionWithoutColon, sentinel.position()));
                },
                Pending::Group(group) => {
                    let opening = group.opening.to_string().chars().next().unwrap_or('(');
                    return Err(SyntaxError::new(SyntaxErrorKind::UnclosedParenthesis { opening },
                                                group.opening.position()));
                },
            }
        }

        validate(&self.output)?;
        Ok(self.output)
    }
}

/// Checks that an RPN sequence leaves exactly one value and that
/// assignments target a plain variable.
///
/// # Errors
/// `InvalidAssignment` for assignments to anything but a variable,
/// `MissingOperand` if an operator would run out of operands and
/// `Unexpected token` for tokens that have no place in RPN.
pub fn validate(rpn: &[Token]) -> ParseResult<()> {
    // Each entry records whether the value is a bare variable.
    let mut stack: Vec<bool> = Vec::new();

    for (i, token) in rpn.iter().enumerate() {
        let arity = match token.kind() {
            TokenType::Number | TokenType::String | TokenType::Constant => {
                stack.push(false);
                continue;
            },
            TokenType::Variable => {
                stack.push(true);
                continue;
            },
            TokenType::Function => counted_arity(rpn, i)? + 1,
            TokenType::Operator => match token.as_str().unwrap_or_default() {
                NEGATION | "!" | "~" => 1,
                TERNARY => 3,
                RANGE_BUILD | SET_BUILD | ARRAY_BUILD => counted_arity(rpn, i)? + 1,
                "=" => {
                    let value = stack.pop();
                    let target = stack.pop();
                    if value.is_none() || target != Some(true) {
                        return Err(SyntaxError::new(SyntaxErrorKind::InvalidAssignment, token.position()));
                    }
                    stack.push(false);
                    continue;
                },
                symbol if symbol == INDEX || is_binary_operator(symbol) => 2,
                _ => return Err(unexpected(token)),
            },
            _ => return Err(unexpected(token)),
        };

        if stack.len() < arity {
            return Err(SyntaxError::new(SyntaxErrorKind::MissingOperand { operator: token.to_string() },
                                        token.position()));
        }
        stack.truncate(stack.len() - arity);
        stack.push(false);
    }

    match stack.len() {
        1 => Ok(()),
        0 => Err(SyntaxError::new(SyntaxErrorKind::EmptyExpression, Position::default())),
        _ => {
            let position = rpn.last().map(Token::position).unwrap_or_default();
            Err(SyntaxError::new(SyntaxErrorKind::MissingOperator { value: rpn.last().map(ToString::to_string).unwrap_or_default() },
                                 position))
        },
    }
}

/// Reads the count stored in the `NUMBER` token right before position `i`.
fn counted_arity(rpn: &[Token], i: usize) -> ParseResult<usize> {
    i.checked_sub(1)
     .and_then(|j| rpn[j].as_number())
     .and_then(|n| f64_to_u64_checked(n).ok())
     .and_then(|n| usize::try_from(n).ok())
     .ok_or_else(|| unexpected(&rpn[i]))
}

fn count_token(count: usize, position: Position) -> Token {
    Token::number(usize_to_f64(count), position)
}

fn unexpected(token: &Token) -> SyntaxError {
    SyntaxError::new(SyntaxErrorKind::UnexpectedToken { value: token.to_string() }, token.position())
}

const fn is_opening(kind: TokenType) -> bool {
    matches!(kind, TokenType::OpeningParen | TokenType::OpeningBracket | TokenType::OpeningBrace)
}

/// Returns the closing delimiter type that matches an opening one.
#[must_use]
pub const fn closing_for(kind: TokenType) -> Option<TokenType> {
    match kind {
        TokenType::OpeningParen => Some(TokenType::ClosingParen),
        TokenType::OpeningBracket => Some(TokenType::ClosingBracket),
        TokenType::OpeningBrace => Some(TokenType::ClosingBrace),
        _ => None,
    }
}
