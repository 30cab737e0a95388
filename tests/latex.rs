use qformula::{
    interpreter::{
        input_stream::Position,
        token::{Token, TokenType},
    },
    latex::latexify_rpn,
    latexify, latexify_unit, parse, parse_unit,
};

fn latex(text: &str) -> String {
    let parsed = parse(text, &[]).unwrap_or_else(|e| panic!("Parsing '{text}' failed: {e}"));
    latexify(&parsed).unwrap_or_else(|e| panic!("Rendering '{text}' failed: {e}"))
}

#[test]
fn operators_and_parentheses() {
    assert_eq!(latex("3+10^4"), r"3 + 10^{4}");
    assert_eq!(latex("(a+b)*c"), r"\left(a + b\right) \cdot c");
    assert_eq!(latex("a-(b-c)"), r"a - \left(b - c\right)");
    assert_eq!(latex("a-b-c"), r"a - b - c");
    assert_eq!(latex("(a+1)/2"), r"\frac{a + 1}{2}");
    assert_eq!(latex("a % b"), r"a \bmod b");
}

#[test]
fn powers_and_negation() {
    assert_eq!(latex("-x^2"), r"-x^{2}");
    assert_eq!(latex("(-x)^2"), r"\left(-x\right)^{2}");
    assert_eq!(latex("-(a+b)"), r"-\left(a + b\right)");
    assert_eq!(latex("2^3^2"), r"2^{3^{2}}");
    assert_eq!(latex("(2^3)^2"), r"\left(2^{3}\right)^{2}");
}

#[test]
fn functions() {
    assert_eq!(latex("sqrt(x)"), r"\sqrt{x}");
    assert_eq!(latex("abs(x-1)"), r"\left|x - 1\right|");
    assert_eq!(latex("sin(x)"), r"\sin\left(x\right)");
    assert_eq!(latex("asin(x)"), r"\arcsin\left(x\right)");
    assert_eq!(latex("exp(2x)"), r"e^{2 \cdot x}");
    assert_eq!(latex("fact(n)"), r"n!");
    assert_eq!(latex("fact(n+1)"), r"\left(n + 1\right)!");
    assert_eq!(latex("ncr(n, k)"), r"\binom{n}{k}");
    assert_eq!(latex("log(x, 2)"), r"\log_{2}\left(x\right)");
    assert_eq!(latex("floor(x)"), r"\left\lfloor x\right\rfloor");
    assert_eq!(latex("stdnormpdf(x)"), r"\mathrm{stdnormpdf}\left(x\right)");
    assert_eq!(latex("pi()"), r"\pi");
}

#[test]
fn names_numbers_and_strings() {
    assert_eq!(latex("2 pi"), r"2 \cdot \pi");
    assert_eq!(latex("π"), r"\pi");
    assert_eq!(latex("alpha + beta_1"), r"\alpha + \beta_{1}");
    assert_eq!(latex("velocity"), r"\mathrm{velocity}");
    assert_eq!(latex("1e-2"), r"10^{-2}");
    assert_eq!(latex("2.5e3"), r"2.5 \cdot 10^{3}");
    assert_eq!(latex("\"50%\""), r"\text{50\%}");
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(latex("a <= b"), r"a \le b");
    assert_eq!(latex("a != b"), r"a \neq b");
    assert_eq!(latex("a == b"), r"a = b");
    assert_eq!(latex("a && !b"), r"a \land \lnot b");
    assert_eq!(latex("x = 2"), r"x = 2");
    assert_eq!(latex("a ? b : c"), r"\begin{cases} b & \text{if } a \\ c & \text{otherwise} \end{cases}");
}

#[test]
fn collections_and_statements() {
    assert_eq!(latex("[1, 2]"), r"\left[1, 2\right]");
    assert_eq!(latex("{1, 2:5}"), r"\left\{1, 2:5\right\}");
    assert_eq!(latex("a[1]"), r"a\left[1\right]");
    assert_eq!(latex("a = 1; b = 2"), r"a = 1;\;b = 2");
    assert_eq!(latex("for (i : [1]) s = i"), r"\text{for (i : [1]) s = i}");
}

#[test]
fn malformed_rpn_is_an_error() {
    let plus = Token::text(TokenType::Operator, "+", Position::default());
    assert!(latexify_rpn(&[plus]).is_err());
    assert!(latexify_rpn(&[]).is_err());
}

#[test]
fn units() {
    let unit = parse_unit("kg m/s^2").unwrap();
    assert_eq!(latexify_unit(&unit), r"\mathrm{kg}\,\mathrm{m}\,\mathrm{s}^{-2}");
    assert_eq!(latexify_unit(&parse_unit("").unwrap()), "");
}
