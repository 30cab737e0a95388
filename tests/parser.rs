use qformula::{
    error::SyntaxErrorKind,
    interpreter::parser::{core::Parser, statement::Statement},
    parse,
};

fn parsed(text: &str, known: &[&str]) -> Parser {
    parse(text, known).unwrap_or_else(|e| panic!("Parsing '{text}' failed: {e}"))
}

fn rpn_with(text: &str, known: &[&str]) -> Vec<String> {
    let parser = parsed(text, known);
    let expression = parser.statements()[0].as_expression()
                                           .unwrap_or_else(|| panic!("'{text}' is not an expression"));
    expression.body.iter().map(ToString::to_string).collect()
}

fn rpn(text: &str) -> Vec<String> {
    rpn_with(text, &[])
}

fn parse_error(text: &str) -> String {
    match parse(text, &[]) {
        Ok(_) => panic!("Parsing '{text}' succeeded but was expected to fail"),
        Err(e) => e.to_string(),
    }
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(rpn("3+10^4"), ["3", "10", "4", "^", "+"]);
    assert_eq!(rpn("2^3^2"), ["2", "3", "2", "^", "^"]);
    assert_eq!(rpn("8-3-1"), ["8", "3", "-", "1", "-"]);
    assert_eq!(rpn("1+2*3"), ["1", "2", "3", "*", "+"]);
    assert_eq!(rpn("(1+2)*3"), ["1", "2", "+", "3", "*"]);
    assert_eq!(rpn("x = y = 2"), ["x", "y", "2", "=", "="]);
}

#[test]
fn unary_operators() {
    assert_eq!(rpn("-a^2"), ["a", "2", "^", "_"]);
    assert_eq!(rpn("-2.5"), ["2.5", "_"]);
    assert_eq!(rpn("+3"), ["3"]);
    assert_eq!(rpn("!0"), ["0", "!"]);
}

#[test]
fn implicit_multiplication() {
    assert_eq!(rpn("2x"), ["2", "x", "*"]);
    assert_eq!(rpn("2(a+b)"), ["2", "a", "b", "+", "*"]);
    assert_eq!(rpn("sin(x)cos(x)"), ["x", "1", "sin", "x", "1", "cos", "*"]);
    assert_eq!(rpn("2 pi"), ["2", "pi", "*"]);
}

#[test]
fn calls_collections_and_ternary() {
    assert_eq!(rpn("atan2(1, 2)"), ["1", "2", "2", "atan2"]);
    assert_eq!(rpn("pi()"), ["0", "pi"]);
    assert_eq!(rpn("\\sin(1)"), ["1", "1", "sin"]);
    assert_eq!(rpn("[1, 2]"), ["1", "2", "2", "%%arraybuild"]);
    assert_eq!(rpn("{1, 2:5}"), ["1", "2", "5", "2", "%%rangebuild", "2", "%%setbuild"]);
    assert_eq!(rpn("{0:1:0.25}"), ["0", "1", "0.25", "3", "%%rangebuild", "1", "%%setbuild"]);
    assert_eq!(rpn("a ? b : c"), ["a", "b", "c", "%%ternary"]);
    assert_eq!(rpn("a[1]"), ["a", "1", "[]"]);
    assert_eq!(rpn("[10, 20][0]"), ["10", "20", "2", "%%arraybuild", "0", "[]"]);
}

#[test]
fn known_variables_shadow_functions() {
    assert_eq!(rpn_with("sin * 2", &["sin"]), ["sin", "2", "*"]);
    assert_eq!(rpn_with("3 stdnormpdf", &["stdnormpdf"]), ["3", "stdnormpdf", "*"]);
    assert_eq!(parse_error("3 stdnormpdf"),
               "1:2:Function 'stdnormpdf' must be called with parentheses.");
}

#[test]
fn statements_and_sources() {
    let parser = parsed("a = 1; b = 2;\n c = a + b", &[]);
    let sources = parser.statements().iter().map(Statement::source).collect::<Vec<_>>();

    assert_eq!(sources, ["a = 1", "b = 2", "c = a + b"]);
    assert!(parser.has_variables());
    assert!(parsed("", &[]).statements().is_empty());
}

#[test]
fn for_loops() {
    let parser = parsed("s = 0; for (i : [1, 2]) { s = s + i; s = s * 2 }", &[]);

    let Statement::ForLoop(for_loop) = &parser.statements()[1] else {
        panic!("expected a for loop");
    };
    assert_eq!(for_loop.variable, "i");
    assert_eq!(for_loop.body.len(), 2);
    assert_eq!(for_loop.iterable.source, "[1, 2]");

    let single = parsed("for (i : {1:3}) s = i; s", &[]);
    assert_eq!(single.statements().len(), 2);

    assert!(parse("for (sin : [1]) 1", &[]).is_err());
    assert!(parse("for (i [1]) 1", &[]).is_err());
    assert!(parse("for (i : [1]) { 1", &[]).is_err());
}

#[test]
fn delimiter_errors() {
    assert_eq!(parse_error("(1 + 2"), "1:0:Unbalanced parenthesis, '(' is never closed.");
    assert_eq!(parse_error("1 + 2)"), "1:5:Unbalanced parenthesis, stray ')' found.");
    assert_eq!(parse_error("[1, 2)"), "1:0:Mismatched parentheses, '[' is closed by ')'.");
    assert_eq!(parse_error("a = 1;\nb = (2"), "2:4:Unbalanced parenthesis, '(' is never closed.");
}

#[test]
fn operand_and_operator_errors() {
    assert_eq!(parse_error("2 3"), "1:2:Syntax error: missing operator before '3'.");
    assert_eq!(parse_error("1 +"), "1:2:Syntax error: missing operand for '+'.");
    assert_eq!(parse_error("pi = 3"), "1:0:Cannot assign to the constant or function 'pi'.");
    assert!(parse_error("3 = 4").ends_with("Left-hand side of assignment must be a variable."));
    assert!(parse_error("a ? b").ends_with("Syntax error: '?' without matching ':'."));
    assert!(parse_error("\\foo(1)").ends_with("Unknown function: 'foo'."));
}

#[test]
fn errors_expose_kind_and_position() {
    let error = parse("1 + (2", &[]).unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::UnclosedParenthesis { opening: '(' });
    assert_eq!(error.position.column, 4);
    assert_eq!(error.message(), "Unbalanced parenthesis, '(' is never closed.");
}
