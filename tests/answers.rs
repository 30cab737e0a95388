use qformula::{
    AnswerType,
    answer::{is_acceptable_for_answertype, split_number_and_unit},
    classify_answer_type,
    interpreter::parser::statement::Statement,
    parse,
};

const ALL_TYPES: [AnswerType; 4] =
    [AnswerType::Number, AnswerType::Numeric, AnswerType::NumericalFormula, AnswerType::Algebraic];

fn classify_with(text: &str, known: &[&str]) -> Option<AnswerType> {
    let parsed = parse(text, known).unwrap_or_else(|e| panic!("Parsing '{text}' failed: {e}"));
    classify_answer_type(&parsed)
}

fn classify(text: &str) -> Option<AnswerType> {
    classify_with(text, &[])
}

fn split(text: &str) -> (String, String) {
    split_number_and_unit(text)
}

#[test]
fn numbers_and_constants() {
    for text in ["3", "-2.5", "1e-2", "1E5", ".12", "pi", "π", "-pi", "pi()", "+7"] {
        assert_eq!(classify(text), Some(AnswerType::Number), "'{text}'");
    }
}

#[test]
fn arithmetic_is_numeric() {
    for text in ["3+10^4", "2*pi", "-(1+2)", "1/3", "2**3", "(4)-(-5)"] {
        assert_eq!(classify(text), Some(AnswerType::Numeric), "'{text}'");
    }
}

#[test]
fn whitelisted_functions_are_numerical_formulas() {
    for text in ["sin(3)-3+exp(4)", "sqrt(2)", "stdnormpdf(1)", "log(8, 2)", "fact(4) + ncr(5, 2)"] {
        assert_eq!(classify(text), Some(AnswerType::NumericalFormula), "'{text}'");
    }
}

#[test]
fn free_identifiers_are_algebraic() {
    assert_eq!(classify("a*b*c"), Some(AnswerType::Algebraic));
    assert_eq!(classify("sin(x)^2 + 1"), Some(AnswerType::Algebraic));
    assert_eq!(classify_with("3 stdnormpdf", &["stdnormpdf"]), Some(AnswerType::Algebraic));
}

#[test]
fn dangling_exponent_reads_as_a_product_with_e() {
    let parsed = parse("1e", &[]).unwrap_or_else(|e| panic!("Parsing '1e' failed: {e}"));
    let body = match parsed.statements() {
        [Statement::Expression(expression)] => expression.body.iter().map(ToString::to_string).collect::<Vec<_>>(),
        other => panic!("expected one expression, got {other:?}"),
    };

    assert_eq!(body, ["1", "e", "*"]);
    assert_eq!(classify("1e"), Some(AnswerType::Algebraic));
    assert_eq!(classify("1e0"), Some(AnswerType::Number));
    assert!(!is_acceptable_for_answertype("1e", AnswerType::Number, &[]));
}

#[test]
fn everything_else_is_unacceptable() {
    for text in ["a = 3", "1; 2", "[1, 2]", "{1, 2}", "\"text\"", "2 < 3", "sort([1])", "a ? 1 : 2", "5 % 2", ""] {
        assert_eq!(classify(text), None, "'{text}'");
    }
}

#[test]
fn acceptability_follows_the_order_of_types() {
    assert!(AnswerType::Number < AnswerType::Numeric);
    assert!(AnswerType::NumericalFormula < AnswerType::Algebraic);

    let accepted = ALL_TYPES.iter()
                            .filter(|t| is_acceptable_for_answertype("3+4", **t, &[]))
                            .copied()
                            .collect::<Vec<_>>();
    assert_eq!(accepted, [AnswerType::Numeric, AnswerType::NumericalFormula, AnswerType::Algebraic]);

    assert!(is_acceptable_for_answertype("3 stdnormpdf", AnswerType::Algebraic, &["stdnormpdf"]));
    assert!(!is_acceptable_for_answertype("3 stdnormpdf", AnswerType::Algebraic, &[]));
}

#[test]
fn invalid_syntax_is_never_acceptable() {
    for text in ["3 +", "(1", "2 3", "sin 2", "$"] {
        for answer_type in ALL_TYPES {
            assert!(!is_acceptable_for_answertype(text, answer_type, &[]), "'{text}' as {answer_type}");
        }
    }
}

#[test]
fn answer_types_print_their_names() {
    let names = ALL_TYPES.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(names, ["NUMBER", "NUMERIC", "NUMERICAL_FORMULA", "ALGEBRAIC"]);
}

#[test]
fn splitting_numbers_from_units() {
    assert_eq!(split("1000 g m/s"), ("1000".to_string(), "g m/s".to_string()));
    assert_eq!(split("9.81 m/s^2"), ("9.81".to_string(), "m/s^2".to_string()));
    assert_eq!(split("-3 kg"), ("-3".to_string(), "kg".to_string()));
    assert_eq!(split("10^3 g"), ("10^3".to_string(), "g".to_string()));
    assert_eq!(split("2.5e3"), ("2.5e3".to_string(), String::new()));
    assert_eq!(split("  kg  "), (String::new(), "kg".to_string()));
    assert_eq!(split(""), (String::new(), String::new()));
}
