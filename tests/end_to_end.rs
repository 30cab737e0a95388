use qformula::{
    AnswerType, check_convertibility, classify_answer_type, evaluate,
    interpreter::{
        evaluator::core::{Evaluator, ScopeLayer},
        lexer::Lexer,
    },
    parse, parse_unit, split_number_and_unit,
};
use rand::{SeedableRng, rngs::StdRng};

fn rpn(text: &str) -> Vec<String> {
    let parsed = parse(text, &[]).unwrap();
    parsed.statements()[0].as_expression()
                          .map(|e| e.body.iter().map(ToString::to_string).collect())
                          .unwrap_or_default()
}

fn value(text: &str) -> f64 {
    let parsed = parse(text, &[]).unwrap();
    evaluate(&parsed, &mut Evaluator::new()).unwrap()
                                            .and_then(|v| v.as_number())
                                            .unwrap_or_else(|| panic!("'{text}' has no numeric value"))
}

#[test]
fn numeric_answer() {
    let parsed = parse("3+10^4", &[]).unwrap();

    assert_eq!(classify_answer_type(&parsed), Some(AnswerType::Numeric));
    assert_eq!(rpn("3+10^4"), ["3", "10", "4", "^", "+"]);
    assert!((value("3+10^4") - 10_003.0).abs() < 1e-9);
}

#[test]
fn numerical_formula_answer() {
    let parsed = parse("sin(3)-3+exp(4)", &[]).unwrap();

    assert_eq!(classify_answer_type(&parsed), Some(AnswerType::NumericalFormula));
    assert!((value("sin(3)-3+exp(4)") - (3.0_f64.sin() - 3.0 + 4.0_f64.exp())).abs() < 1e-9);
}

#[test]
fn algebraic_answer() {
    let parsed = parse("a*b*c", &[]).unwrap();
    assert_eq!(classify_answer_type(&parsed), Some(AnswerType::Algebraic));
}

#[test]
fn whitelisted_identifier() {
    let known = parse("3 stdnormpdf", &["stdnormpdf"]).unwrap();
    assert_eq!(classify_answer_type(&known), Some(AnswerType::Algebraic));
    assert!(parse("3 stdnormpdf", &[]).is_err());
}

#[test]
fn scientific_notation() {
    let parsed = parse("1e-2", &[]).unwrap();
    assert_eq!(classify_answer_type(&parsed), Some(AnswerType::Number));
    assert!((value("1e-2") - 0.01).abs() < 1e-15);

    let tokens = Lexer::new("1e").tokenize().unwrap();
    assert_eq!(tokens[0].as_number(), Some(1.0));
    assert!(parse("1e", &[]).is_ok());
}

#[test]
fn answer_with_unit() {
    let (number, unit) = split_number_and_unit("1000 g m/s");
    let expected = parse_unit("kg m/s").unwrap();

    let conversion = check_convertibility(&expected, &parse_unit(&unit).unwrap());
    assert!(conversion.convertible);
    assert!((conversion.cfactor - 1000.0).abs() < 1e-9);
    assert!((value(&number) / conversion.cfactor - 1.0).abs() < 1e-12);
}

#[test]
fn question_with_random_global_and_local_layers() {
    let mut evaluator = Evaluator::new();
    evaluator.evaluate_text("m = {2, 4, 8}; order = shuffle([1, 2, 3])").unwrap();
    evaluator.instantiate_random_variables(&mut StdRng::seed_from_u64(11));

    evaluator.push_scope(ScopeLayer::Global);
    evaluator.evaluate_text("g = 9.81; weight = m * g").unwrap();

    evaluator.push_scope(ScopeLayer::Local);
    let results = evaluator.evaluate_text("weight / g; sum(order)").unwrap();

    let m = results[0].as_number().unwrap();
    assert!([2.0, 4.0, 8.0].iter().any(|c| (c - m).abs() < 1e-12));
    assert_eq!(results[1].as_number(), Some(6.0));
    assert_eq!(evaluator.how_many_datasets(), 18);
}
