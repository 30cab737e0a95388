use qformula::{
    evaluate,
    interpreter::{
        evaluator::core::{Evaluator, ScopeLayer},
        token::{Token, TokenType},
    },
    parse,
};

fn evaluator() -> Evaluator {
    let mut evaluator = Evaluator::with_seed(3);
    evaluator.push_scope(ScopeLayer::Global);
    evaluator
}

fn eval(text: &str) -> Token {
    evaluator().evaluate_text(text)
               .unwrap_or_else(|e| panic!("Evaluating '{text}' failed: {e}"))
               .pop()
               .unwrap_or_else(|| panic!("'{text}' produced no value"))
}

fn eval_number(text: &str) -> f64 {
    eval(text).as_number()
              .unwrap_or_else(|| panic!("'{text}' did not evaluate to a number"))
}

fn eval_error(text: &str) -> String {
    match evaluator().evaluate_text(text) {
        Ok(values) => panic!("Evaluating '{text}' succeeded with {values:?} but was expected to fail"),
        Err(e) => e.to_string(),
    }
}

fn assert_close(text: &str, expected: f64) {
    let value = eval_number(text);
    assert!((value - expected).abs() < 1e-9, "'{text}' evaluated to {value}, expected {expected}");
}

#[test]
fn arithmetic() {
    assert_close("1 + 2 * 3", 7.0);
    assert_close("2^10", 1024.0);
    assert_close("2**-1", 0.5);
    assert_close("10 / 4", 2.5);
    assert_close("7 % 3", 1.0);
    assert_close("-7 % 3", -1.0);
    assert_close("-2^2", -4.0);
    assert_close("sin(3)-3+exp(4)", 3.0_f64.sin() - 3.0 + 4.0_f64.exp());
    assert_close("2 pi", 2.0 * std::f64::consts::PI);
    assert_close("π", std::f64::consts::PI);
}

#[test]
fn comparisons_and_logic() {
    assert_close("2 < 3", 1.0);
    assert_close("2 == 3", 0.0);
    assert_close("3 >= 3", 1.0);
    assert_close("\"a\" < \"b\"", 1.0);
    assert_close("\"a\" == \"a\"", 1.0);
    assert_close("1 && 0", 0.0);
    assert_close("0 || 2", 1.0);
    assert_close("!0", 1.0);
    assert_close("~0", -1.0);
    assert_close("6 & 3", 2.0);
    assert_close("6 | 3", 7.0);
    assert_close("1 << 4", 16.0);
    assert_close("256 >> 4", 16.0);
    assert_close("1 ? 2 : 3", 2.0);
    assert_close("0 ? 2 : 3", 3.0);
}

#[test]
fn strings_and_indexing() {
    assert_eq!(eval("\"ab\" + \"cd\"").to_string(), "abcd");
    assert_eq!(eval("\"hello\"[1]").to_string(), "e");
    assert_close("[10, 20, 30][-1]", 30.0);
    assert_close("a = [1, [2, 3]]; a[1][0]", 2.0);
    assert!(eval_error("[1, 2][2]").ends_with("Index out of range: 2."));
}

#[test]
fn math_functions() {
    assert_close("sqrt(16)", 4.0);
    assert_close("abs(-3)", 3.0);
    assert_close("round(2.5)", 3.0);
    assert_close("round(-2.5)", -3.0);
    assert_close("round(3.14159, 2)", 3.14);
    assert_close("sign(-42) + sign(0)", -1.0);
    assert_close("floor(2.7) + ceil(2.2)", 5.0);
    assert_close("atan2(1, 1)", std::f64::consts::FRAC_PI_4);
    assert_close("fmod(7, 4)", 3.0);
    assert_close("pi()", std::f64::consts::PI);
}

#[test]
fn logarithms() {
    assert_close("ln(exp(2))", 2.0);
    assert_close("log(exp(1))", 1.0);
    assert_close("log(100, 10)", 2.0);
    assert_close("log10(1000)", 3.0);
    assert_close("lg(0.01)", -2.0);
    assert_close("lb(8) + log2(4)", 5.0);
    assert!(evaluator().evaluate_text("ln(0)").is_err());
    assert!(evaluator().evaluate_text("log(8, 1)").is_err());
}

#[test]
fn combinatorics_and_statistics() {
    assert_close("fact(5)", 120.0);
    assert_close("fact(0)", 1.0);
    assert_close("ncr(5, 2)", 10.0);
    assert_close("ncr(2, 5)", 0.0);
    assert_close("npr(5, 2)", 20.0);
    assert_close("gcd(12, 18)", 6.0);
    assert_close("lcm(4, 6)", 12.0);

    assert!((eval_number("stdnormcdf(0)") - 0.5).abs() < 1e-6);
    assert!((eval_number("normcdf(1, 1, 2)") - 0.5).abs() < 1e-6);
    assert!((eval_number("stdnormpdf(0)") - 1.0 / (2.0 * std::f64::consts::PI).sqrt()).abs() < 1e-12);

    assert!(evaluator().evaluate_text("fact(-1)").is_err());
    assert!(evaluator().evaluate_text("fact(2.5)").is_err());
}

#[test]
fn list_functions() {
    assert_close("len([1, 2, 3])", 3.0);
    assert_close("len(\"héllo\")", 5.0);
    assert_close("len({1:1e10})", 9_999_999_999.0);
    assert_close("sum([1, 2, 3])", 6.0);
    assert_close("sum(1, 2, 3)", 6.0);
    assert_close("max([3, 9, 2])", 9.0);
    assert_close("min(3, 9, 2)", 2.0);
    assert_eq!(eval("sort([3, 1, 2])").to_string(), "[1, 2, 3]");
    assert_eq!(eval("sort([\"b\", \"a\"])").to_string(), "[\"a\", \"b\"]");
    assert_eq!(eval("concat([1], [2, 3])").to_string(), "[1, 2, 3]");
    assert_eq!(eval("join(\", \", [1, 2])").to_string(), "1, 2");
    assert_eq!(eval("str(2.5)").to_string(), "2.5");
    assert_eq!(eval("fill(3, 0)").to_string(), "[0, 0, 0]");
    assert_close("pick(2, 10, 20, 30)", 30.0);
    assert_close("pick(1.7, [10, 20, 30])", 20.0);
    assert_close("pick(5, 10, 20, 30)", 10.0);

    let shuffled = eval("sort(shuffle([3, 1, 2]))");
    assert_eq!(shuffled.to_string(), "[1, 2, 3]");
}

#[test]
fn function_errors() {
    assert_eq!(eval_error("sqrt(1, 2)"), "1:0:Function sqrt() expects 1 argument, but received 2.");
    assert!(eval_error("round(1, 2, 3)").ends_with("Function round() expects 1 or 2 arguments, but received 3."));
    assert!(eval_error("sort([1, \"a\"])").ends_with("sort() needs a list of only numbers or only strings."));
    assert!(eval_error("sum([1, \"a\"])").contains("Number expected"));
}

#[test]
fn collections() {
    assert_eq!(eval("[1:4]").to_string(), "[1, 2, 3]");
    assert_eq!(eval("[0:1:0.25]").to_string(), "[0, 0.25, 0.5, 0.75]");
    assert_eq!(eval("{1, 3:5}").kind(), TokenType::Set);
    assert!(eval_error("[0:2000]").ends_with("Lists with more than 1000 elements are not allowed."));
    assert!(eval_error("fill(1001, 0)").ends_with("Lists with more than 1000 elements are not allowed."));
    assert!(evaluator().evaluate_text("{1:2:0}").is_err());
}

#[test]
fn assignments_and_loops() {
    assert_close("a = 3; b = a^2 + 1", 10.0);
    assert_close("s = 0; for (i : {1:5}) s = s + i; s", 10.0);
    assert_close("s = 1; for (i : [1, 2, 3]) { s = s * 2; s = s + i }; s", 19.0);
    assert_close("for (c : \"abc\") last = c; len(last)", 1.0);
}

#[test]
fn evaluation_errors() {
    assert_eq!(eval_error("1/0"), "1:1:Division by zero is not defined.");
    assert!(eval_error("x + 1").ends_with("Unknown variable: x."));
    assert!(eval_error("5 % 0").ends_with("Modulo by zero is not defined."));
    assert!(eval_error("0^-1").ends_with("Division by zero is not defined."));
    assert!(eval_error("sqrt(-1)").contains("sqrt"));
    assert!(eval_error("\"a\" * 2").ends_with("Operator '*' cannot be applied to string \"a\"."));
}

#[test]
fn errors_keep_earlier_assignments() {
    let mut evaluator = evaluator();
    assert!(evaluator.evaluate_text("a = 2; b = 1/0").is_err());

    assert_eq!(evaluator.get_variable("a").and_then(|v| v.value.as_number()), Some(2.0));
    assert!(evaluator.get_variable("b").is_none());
}

#[test]
fn scopes_shadow_and_pop() {
    let mut evaluator = Evaluator::new();
    assert!(evaluator.pop_scope().is_none());

    evaluator.push_scope(ScopeLayer::Global);
    evaluator.evaluate_text("a = 1").unwrap();
    evaluator.push_scope(ScopeLayer::Local);

    let shadowed = evaluator.evaluate_text("a = 2; a").unwrap();
    assert_eq!(shadowed[1].as_number(), Some(2.0));

    evaluator.pop_scope();
    let restored = evaluator.evaluate_text("a").unwrap();
    assert_eq!(restored[0].as_number(), Some(1.0));
    assert_eq!(evaluator.current_layer(), ScopeLayer::Global);
}

#[test]
fn algebraic_variables() {
    let mut evaluator = evaluator();
    evaluator.evaluate_text("x = {1:10:0.5}").unwrap();

    let error = evaluator.evaluate_text("x + 1").unwrap_err();
    assert!(error.to_string().ends_with("Algebraic variable 'x' cannot be used in this context."));

    let differences = evaluator.evaluate_text("diff([\"(x+1)^2\", \"2x\", 3], [\"x^2+2x+1\", \"x\", 1.5])")
                               .unwrap()
                               .pop()
                               .unwrap();
    let values = differences.to_string();
    let parts = values.trim_matches(|c| c == '[' || c == ']')
                      .split(", ")
                      .map(|p| p.parse::<f64>().unwrap())
                      .collect::<Vec<_>>();

    assert!(parts[0] < 1e-9);
    assert!(parts[1] > 1.0);
    assert!((parts[2] - 1.5).abs() < 1e-12);

    assert!(evaluator.evaluate_text("diff([1], [1, 2])").is_err());
}

#[test]
fn evaluate_returns_the_last_value() {
    let mut evaluator = evaluator();
    let parsed = parse("a = 4; for (i : [1]) a = a + i; a * 2", &[]).unwrap();

    let value = evaluate(&parsed, &mut evaluator).unwrap();
    assert_eq!(value.and_then(|v| v.as_number()), Some(10.0));

    let empty = parse("", &[]).unwrap();
    assert!(evaluate(&empty, &mut evaluator).unwrap().is_none());
}
