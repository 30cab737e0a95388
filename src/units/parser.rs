use std::iter::Peekable;

use crate::{
    error::UnitError,
    units::{
        lexer::{UnitToken, tokenize},
        unit::Unit,
    },
};

/// Result type of the unit grammar.
pub type UnitResult<T> = Result<T, UnitError>;

/// Parses a unit string into a normalized [`Unit`].
///
/// Grammar:
/// ```text
///     unit        := ε | numerator ( '/' denominator )?
///     numerator   := factor+
///     denominator := factor | '(' factor+ ')'
///     factor      := SYMBOL ( '^' exponent )?
///     exponent    := ['-'] INTEGER | '(' ['+' | '-'] INTEGER ')'
/// ```
///
/// Factors multiply by juxtaposition. There is no `*`, at most one `/`,
/// and only single symbols take exponents, so `m*s`, `m/s/K` and
/// `(m/s)^2` are all rejected.
///
/// # Errors
/// The first token that does not fit the grammar.
///
/// # Example
/// ```
/// use qformula::units::parser::parse;
///
/// let unit = parse("J / (m K)").unwrap();
/// assert_eq!(unit.to_string(), "J m^-1 K^-1");
///
/// assert!(parse("").unwrap().is_empty());
/// assert!(parse("m*s").is_err());
/// assert!(parse("(m/s)^2").is_err());
/// assert!(parse("1/s").is_err());
/// ```
pub fn parse(text: &str) -> UnitResult<Unit> {
    let tokens = tokenize(text)?;
    let mut iter = tokens.iter().peekable();
    let mut unit = Unit::new();

    if iter.peek().is_none() {
        return Ok(unit);
    }

    parse_product(&mut iter, &mut unit, 1)?;

    if let Some((UnitToken::Slash, _)) = iter.peek() {
        iter.next();
        parse_denominator(&mut iter, &mut unit)?;
    }

    match iter.next() {
        None => Ok(unit),
        Some((token, offset)) => Err(unexpected(token, *offset)),
    }
}

fn unexpected(token: &UnitToken, offset: usize) -> UnitError {
    UnitError::UnexpectedInput { input: token.to_string(),
                                 offset }
}

/// Parses one or more factors, multiplying them into `unit` with the given
/// sign.
fn parse_product<'a, I>(tokens: &mut Peekable<I>, unit: &mut Unit, sign: i32) -> UnitResult<()>
    where I: Iterator<Item = &'a (UnitToken, usize)>
{
    parse_factor(tokens, unit, sign)?;
    while let Some((UnitToken::Symbol(_), _)) = tokens.peek() {
        parse_factor(tokens, unit, sign)?;
    }
    Ok(())
}

fn parse_denominator<'a, I>(tokens: &mut Peekable<I>, unit: &mut Unit) -> UnitResult<()>
    where I: Iterator<Item = &'a (UnitToken, usize)>
{
    match tokens.peek() {
        Some((UnitToken::LParen, _)) => {
            tokens.next();
            parse_product(tokens, unit, -1)?;
            match tokens.next() {
                Some((UnitToken::RParen, _)) => Ok(()),
                Some((token, offset)) => Err(unexpected(token, *offset)),
                None => Err(UnitError::UnexpectedEnd),
            }
        },
        _ => parse_factor(tokens, unit, -1),
    }
}

fn parse_factor<'a, I>(tokens: &mut Peekable<I>, unit: &mut Unit, sign: i32) -> UnitResult<()>
    where I: Iterator<Item = &'a (UnitToken, usize)>
{
    let symbol = match tokens.next() {
        Some((UnitToken::Symbol(symbol), _)) => symbol,
        Some((token, offset)) => return Err(unexpected(token, *offset)),
        None => return Err(UnitError::UnexpectedEnd),
    };

    let exponent = match tokens.peek() {
        Some((UnitToken::Caret, _)) => {
            tokens.next();
            parse_exponent(tokens)?
        },
        _ => 1,
    };

    unit.multiply(symbol, exponent * sign);
    Ok(())
}

fn parse_exponent<'a, I>(tokens: &mut Peekable<I>) -> UnitResult<i32>
    where I: Iterator<Item = &'a (UnitToken, usize)>
{
    let parenthesized = matches!(tokens.peek(), Some((UnitToken::LParen, _)));
    if parenthesized {
        tokens.next();
    }

    let negative = match tokens.peek() {
        Some((UnitToken::Minus, _)) => {
            tokens.next();
            true
        },
        Some((UnitToken::Plus, _)) if parenthesized => {
            tokens.next();
            false
        },
        _ => false,
    };

    let digits = match tokens.next() {
        Some((UnitToken::Integer(digits), _)) => digits,
        Some((token, offset)) => return Err(unexpected(token, *offset)),
        None => return Err(UnitError::UnexpectedEnd),
    };
    let magnitude = digits.parse::<i32>()
                          .map_err(|_| UnitError::InvalidExponent { exponent: digits.clone() })?;

    if parenthesized {
        match tokens.next() {
            Some((UnitToken::RParen, _)) => {},
            Some((token, offset)) => return Err(unexpected(token, *offset)),
            None => return Err(UnitError::UnexpectedEnd),
        }
    }

    Ok(if negative { -magnitude } else { magnitude })
}
