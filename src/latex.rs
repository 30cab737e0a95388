use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    interpreter::{
        parser::{
            core::{ParseResult, Parser},
            shunting_yard::{ARRAY_BUILD, INDEX, NEGATION, RANGE_BUILD, SET_BUILD, TERNARY, precedence},
            statement::Statement,
        },
        token::{Token, TokenType},
    },
    units::unit::Unit,
    util::num::{f64_to_u64_checked, format_number},
};

/// Precedence of fragments that never need parentheses.
const ATOM: u8 = 100;

/// Greek letters that render as their LaTeX command when used as a name.
const GREEK_LETTERS: &[&str] = &["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota",
                                 "kappa", "lambda", "mu", "nu", "xi", "rho", "sigma", "tau", "phi", "chi", "psi",
                                 "omega", "Gamma", "Delta", "Theta", "Lambda", "Xi", "Sigma", "Phi", "Psi", "Omega"];

/// Functions with a LaTeX operator command of their own.
const NAMED_OPERATORS: &[(&str, &str)] = &[("sin", r"\sin"),
                                           ("cos", r"\cos"),
                                           ("tan", r"\tan"),
                                           ("asin", r"\arcsin"),
                                           ("acos", r"\arccos"),
                                           ("atan", r"\arctan"),
                                           ("sinh", r"\sinh"),
                                           ("cosh", r"\cosh"),
                                           ("tanh", r"\tanh"),
                                           ("ln", r"\ln"),
                                           ("log10", r"\log_{10}"),
                                           ("lg", r"\lg"),
                                           ("lb", r"\log_{2}"),
                                           ("log2", r"\log_{2}"),
                                           ("min", r"\min"),
                                           ("max", r"\max"),
                                           ("gcd", r"\gcd")];

/// A rendered subexpression and how tightly it binds.
#[derive(Debug, Clone)]
struct Fragment {
    text:       String,
    precedence: u8,
}

impl Fragment {
    fn atom(text: impl Into<String>) -> Self {
        Self { text:       text.into(),
               precedence: ATOM, }
    }

    fn new(text: impl Into<String>, precedence: u8) -> Self {
        Self { text: text.into(),
               precedence }
    }

    /// The text, wrapped in parentheses if it binds less tightly than
    /// `required`.
    fn wrapped(&self, required: u8) -> String {
        if self.precedence < required {
            format!(r"\left({}\right)", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Renders parsed statements as LaTeX math.
///
/// Statements are joined with `;\;`. Loops are rendered as their source
/// text.
///
/// # Errors
/// `Unexpected token` for RPN that does not come from the parser.
///
/// # Example
/// ```
/// use qformula::{interpreter::parser::core::Parser, latex::latexify};
///
/// let parser = Parser::new("(a+1)/2 * sqrt(x)^2", &[]).unwrap();
/// assert_eq!(latexify(&parser).unwrap(),
///            r"\frac{a + 1}{2} \cdot \sqrt{x}^{2}");
/// ```
pub fn latexify(parser: &Parser) -> ParseResult<String> {
    let rendered = parser.statements()
                         .iter()
                         .map(|statement| match statement {
                             Statement::Expression(expression) => latexify_rpn(&expression.body),
                             Statement::ForLoop(for_loop) => Ok(format!(r"\text{{{}}}", escape_text(&for_loop.source))),
                         })
                         .collect::<ParseResult<Vec<_>>>()?;
    Ok(rendered.join(r";\;"))
}

/// Renders one RPN sequence as LaTeX.
///
/// # Errors
/// `Unexpected token` if the sequence is not well formed.
pub fn latexify_rpn(body: &[Token]) -> ParseResult<String> {
    let mut stack: Vec<Fragment> = Vec::new();

    for token in body {
        let fragment = match token.kind() {
            TokenType::Number => number(token),
            TokenType::String => Fragment::atom(format!(r"\text{{{}}}", escape_text(token.as_str().unwrap_or_default()))),
            TokenType::Constant => Fragment::atom(r"\pi"),
            TokenType::Variable => Fragment::atom(variable(token.as_str().unwrap_or_default())),
            TokenType::Function => {
                let args = pop_counted(&mut stack, token)?;
                function(token.as_str().unwrap_or_default(), &args)
            },
            TokenType::Operator => operator(token, &mut stack)?,
            _ => return Err(unexpected(token)),
        };
        stack.push(fragment);
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(fragment), true) => Ok(fragment.text),
        _ => Err(SyntaxError::new(SyntaxErrorKind::EmptyExpression, body.first().map(Token::position).unwrap_or_default())),
    }
}

fn unexpected(token: &Token) -> SyntaxError {
    SyntaxError::new(SyntaxErrorKind::UnexpectedToken { value: token.to_string() }, token.position())
}

fn pop(stack: &mut Vec<Fragment>, token: &Token) -> ParseResult<Fragment> {
    stack.pop().ok_or_else(|| unexpected(token))
}

/// Pops the element count stored before `token`, then that many fragments,
/// returned in source order.
fn pop_counted(stack: &mut Vec<Fragment>, token: &Token) -> ParseResult<Vec<Fragment>> {
    let count = pop(stack, token)?.text
                                  .parse::<f64>()
                                  .ok()
                                  .and_then(|n| f64_to_u64_checked(n).ok())
                                  .and_then(|n| usize::try_from(n).ok())
                                  .ok_or_else(|| unexpected(token))?;
    if stack.len() < count {
        return Err(unexpected(token));
    }
    Ok(stack.split_off(stack.len() - count))
}

fn number(token: &Token) -> Fragment {
    match token.metadata() {
        Some(notation) => {
            let exponent = notation.exponent.trim_start_matches('+');
            if notation.mantissa == "1" {
                Fragment::new(format!("10^{{{exponent}}}"), 80)
            } else {
                Fragment::new(format!(r"{} \cdot 10^{{{exponent}}}", notation.mantissa), 60)
            }
        },
        None => Fragment::atom(format_number(token.as_number().unwrap_or_default())),
    }
}

fn variable(name: &str) -> String {
    let (base, subscript) = match name.split_once('_') {
        Some((base, subscript)) if !base.is_empty() && !subscript.is_empty() => (base, Some(subscript)),
        _ => (name, None),
    };

    let base = if GREEK_LETTERS.contains(&base) {
        format!(r"\{base}")
    } else if base.chars().count() == 1 {
        base.to_string()
    } else {
        format!(r"\mathrm{{{}}}", base.replace('_', r"\_"))
    };

    match subscript {
        Some(subscript) => format!("{base}_{{{}}}", variable(subscript)),
        None => base,
    }
}

fn escape_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\\' => r"\textbackslash{}".to_string(),
            '{' | '}' | '_' | '&' | '%' | '$' | '#' => format!(r"\{c}"),
            '~' => r"\textasciitilde{}".to_string(),
            '^' => r"\textasciicircum{}".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

fn joined(args: &[Fragment]) -> String {
    args.iter().map(|a| a.text.as_str()).collect::<Vec<_>>().join(", ")
}

fn function(name: &str, args: &[Fragment]) -> Fragment {
    match (name, args) {
        ("pi", []) => Fragment::atom(r"\pi"),
        ("sqrt", [x]) => Fragment::atom(format!(r"\sqrt{{{}}}", x.text)),
        ("abs", [x]) => Fragment::atom(format!(r"\left|{}\right|", x.text)),
        ("floor", [x]) => Fragment::atom(format!(r"\left\lfloor {}\right\rfloor", x.text)),
        ("ceil", [x]) => Fragment::atom(format!(r"\left\lceil {}\right\rceil", x.text)),
        ("exp", [x]) => Fragment::new(format!("e^{{{}}}", x.text), 80),
        ("fact", [x]) => Fragment::atom(format!("{}!", x.wrapped(ATOM))),
        ("ncr", [n, k]) => Fragment::atom(format!(r"\binom{{{}}}{{{}}}", n.text, k.text)),
        ("log", [x, base]) => Fragment::atom(format!(r"\log_{{{}}}\left({}\right)", base.text, x.text)),
        ("log", [x]) => Fragment::atom(format!(r"\log\left({}\right)", x.text)),
        _ => {
            let command = NAMED_OPERATORS.iter()
                                         .find(|(function, _)| *function == name)
                                         .map_or_else(|| format!(r"\mathrm{{{name}}}"), |(_, command)| (*command).to_string());
            Fragment::atom(format!(r"{command}\left({}\right)", joined(args)))
        },
    }
}

fn binary_symbol(symbol: &str) -> &str {
    match symbol {
        "*" => r"\cdot",
        "%" => r"\bmod",
        "<=" => r"\le",
        ">=" => r"\ge",
        "==" => "=",
        "!=" => r"\neq",
        "&&" => r"\land",
        "||" => r"\lor",
        "&" => r"\mathbin{\&}",
        "|" => r"\mathbin{|}",
        "<<" => r"\ll",
        ">>" => r"\gg",
        other => other,
    }
}

fn operator(token: &Token, stack: &mut Vec<Fragment>) -> ParseResult<Fragment> {
    let symbol = token.as_str().unwrap_or_default();

    let fragment = match symbol {
        NEGATION | "!" | "~" => {
            let operand = pop(stack, token)?;
            let sign = match symbol {
                NEGATION => "-",
                "!" => r"\lnot ",
                _ => r"\sim ",
            };
            Fragment::new(format!("{sign}{}", operand.wrapped(71)), 70)
        },
        TERNARY => {
            let otherwise = pop(stack, token)?;
            let then = pop(stack, token)?;
            let condition = pop(stack, token)?;
            Fragment::atom(format!(r"\begin{{cases}} {} & \text{{if }} {} \\ {} & \text{{otherwise}} \end{{cases}}",
                                   then.text, condition.text, otherwise.text))
        },
        ARRAY_BUILD => Fragment::atom(format!(r"\left[{}\right]", joined(&pop_counted(stack, token)?))),
        SET_BUILD => Fragment::atom(format!(r"\left\{{{}\right\}}", joined(&pop_counted(stack, token)?))),
        RANGE_BUILD => {
            let parts = pop_counted(stack, token)?;
            let texts = parts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>();
            Fragment::new(texts.join(":"), 0)
        },
        INDEX => {
            let index = pop(stack, token)?;
            let collection = pop(stack, token)?;
            Fragment::atom(format!(r"{}\left[{}\right]", collection.wrapped(ATOM), index.text))
        },
        "/" => {
            let denominator = pop(stack, token)?;
            let numerator = pop(stack, token)?;
            Fragment::new(format!(r"\frac{{{}}}{{{}}}", numerator.text, denominator.text), 60)
        },
        "^" | "**" => {
            let exponent = pop(stack, token)?;
            let base = pop(stack, token)?;
            Fragment::new(format!("{}^{{{}}}", base.wrapped(81), exponent.text), 80)
        },
        _ => {
            let strength = precedence(symbol).ok_or_else(|| unexpected(token))?;
            let right = pop(stack, token)?;
            let left = pop(stack, token)?;

            let right_strength = if symbol == "=" { strength } else { strength + 1 };
            Fragment::new(format!("{} {} {}", left.wrapped(strength), binary_symbol(symbol), right.wrapped(right_strength)),
                          strength)
        },
    };

    Ok(fragment)
}

/// Renders a normalized unit as LaTeX, e.g. `\mathrm{m}\,\mathrm{s}^{-2}`.
///
/// # Example
/// ```
/// use qformula::{latex::latexify_unit, units::parser::parse};
///
/// let unit = parse("kg m/s^2").unwrap();
/// assert_eq!(latexify_unit(&unit), r"\mathrm{kg}\,\mathrm{m}\,\mathrm{s}^{-2}");
/// ```
#[must_use]
pub fn latexify_unit(unit: &Unit) -> String {
    unit.factors()
        .iter()
        .map(|(symbol, exponent)| {
            if *exponent == 1 {
                format!(r"\mathrm{{{symbol}}}")
            } else {
                format!(r"\mathrm{{{symbol}}}^{{{exponent}}}")
            }
        })
        .collect::<Vec<_>>()
        .join(r"\,")
}
