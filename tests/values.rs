use std::collections::HashMap;

use qformula::{
    error::EvaluationErrorKind,
    interpreter::{
        evaluator::core::{Evaluator, ScopeLayer},
        input_stream::Position,
        token::{RawValue, Token, TokenType},
        value::{lazylist::Lazylist, random_variable::RandomVariable, range::Range},
    },
};
use rand::{SeedableRng, rngs::StdRng};

fn number(value: f64) -> Token {
    Token::number(value, Position::default())
}

fn numbers(list: &Lazylist) -> Vec<f64> {
    list.iter().filter_map(|t| t.as_number()).collect()
}

#[test]
fn range_count_matches_materialized_length() {
    let cases = [(1.0, 10.0, None), (0.0, 1.0, Some(0.1)), (10.0, 0.0, Some(-2.5)), (0.0, 0.3, Some(0.1)), (3.0, 3.0, None)];

    for (start, end, step) in cases {
        let range = Range::new(start, end, step).unwrap();
        assert_eq!(range.count(), range.iter().count() as u64, "range {start}:{end}:{step:?}");
    }

    assert_eq!(Range::new(0.0, 0.3, Some(0.1)).unwrap().count(), 3);
    assert_eq!(Range::new(10.0, 1.0, None).unwrap().count(), 9);
    assert!(Range::new(1.0, 10.0, Some(-1.0)).unwrap().is_empty());
}

#[test]
fn huge_ranges_are_counted_without_materializing() {
    let range = Range::new(1.0, 1e10, Some(0.1)).unwrap();

    assert_eq!(range.count(), 99_999_999_990);
    assert_eq!(range.get_element(0), Some(1.0));
    assert!((range.get_element(-1).unwrap() - (1e10 - 0.1)).abs() < 1e-3);
}

#[test]
fn invalid_ranges() {
    assert!(matches!(Range::new(1.0, 2.0, Some(0.0)), Err(EvaluationErrorKind::InvalidRange { .. })));
    assert!(Range::new(1.0, f64::INFINITY, None).is_err());
}

#[test]
fn ranges_keep_their_end_bound() {
    let range = Range::new(1.0, 1e300, Some(1e-300)).unwrap();
    assert_eq!(range.end(), 1e300);

    let mut list = Lazylist::new();
    list.append_range(range);
    assert_eq!(list.to_definition(), "{1:1e300:1e-300}");

    let stepped = Range::new(1.0, 10.0, Some(2.0)).unwrap();
    assert_eq!(stepped.end(), 10.0);

    let (head, tail) = stepped.split(2);
    assert_eq!(head.end(), 5.0);
    assert_eq!(tail.end(), 10.0);
    assert_eq!(tail.start(), 5.0);
}

#[test]
fn split_reproduces_the_range() {
    let range = Range::new(0.0, 1.0, Some(0.1)).unwrap();
    let all = range.iter().collect::<Vec<_>>();

    for index in [0, 1, 5, 9, 10, 11, 100] {
        let (head, tail) = range.split(index);
        let joined = head.iter().chain(tail.iter()).collect::<Vec<_>>();
        assert_eq!(joined, all, "split at {index}");
        assert_eq!(head.count(), index.min(range.count()));
    }
}

#[test]
fn lazylist_indexes_across_parts() {
    let mut list = Lazylist::new();
    list.append_value(number(1.0));
    list.append_range(Range::new(2.0, 5.0, None).unwrap());
    list.append_value(Token::string("x", Position::default()));

    assert_eq!(list.count(), 5);
    assert_eq!(list.get(3).and_then(|t| t.as_number()), Some(4.0));
    assert_eq!(list.get(4).map(|t| t.to_string()), Some("x".to_string()));
    assert!(list.get(5).is_none());

    assert_eq!(list.iter().count(), 5);
    assert_eq!(list.iter().count(), 5, "iteration restarts");
    assert_eq!(list.to_definition(), "{1, 2:5:1, \"x\"}");
}

#[test]
fn lazylist_materialize_is_capped() {
    let mut list = Lazylist::new();
    list.append_range(Range::new(0.0, 1e9, None).unwrap());

    assert_eq!(list.count(), 1_000_000_000);
    assert_eq!(list.materialize(1000), Err(EvaluationErrorKind::OversizedCollection));

    let mut small = Lazylist::new();
    small.append_range(Range::new(0.0, 3.0, None).unwrap());
    assert_eq!(numbers(&small), [0.0, 1.0, 2.0]);
    assert_eq!(small.materialize(1000).unwrap().len(), 3);
}

#[test]
fn wrap_and_unpack() {
    for raw in [RawValue::Number(2.5), RawValue::Str("text".to_string())] {
        let token = Token::wrap(raw.clone(), None, Position::default()).unwrap();
        assert_eq!(token.unpack(), raw);
    }

    let list = Token::wrap(RawValue::from(vec![1.0, 2.0]), None, Position::default()).unwrap();
    assert_eq!(list.kind(), TokenType::List);
    assert_eq!(list.to_string(), "[1, 2]");

    let as_string = Token::wrap(RawValue::Number(3.0), Some(TokenType::String), Position::default()).unwrap();
    assert_eq!(as_string.kind(), TokenType::String);
    assert!(Token::wrap(RawValue::Str("abc".to_string()), Some(TokenType::Number), Position::default()).is_err());
}

#[test]
fn wrapping_a_token_coerces_its_value() {
    let text = Token::string("2.5", Position::default());
    let coerced = Token::wrap(RawValue::Token(Box::new(text)), Some(TokenType::Number), Position::default()).unwrap();
    assert_eq!(coerced.kind(), TokenType::Number);
    assert_eq!(coerced.as_number(), Some(2.5));

    let list = Token::list(vec![number(1.0)], Position::default());
    let error = Token::wrap(RawValue::Token(Box::new(list.clone())), Some(TokenType::String), Position::default()).unwrap_err();
    assert!(matches!(error.kind, EvaluationErrorKind::InvalidWrap { .. }));

    let same = Token::wrap(RawValue::Token(Box::new(list.clone())), Some(TokenType::List), Position::default()).unwrap();
    assert_eq!(same, list);

    let as_string = Token::wrap(RawValue::Token(Box::new(number(4.0))), Some(TokenType::String), Position::default()).unwrap();
    assert_eq!(as_string.as_str(), Some("4"));

    let word = Token::string("abc", Position::default());
    assert!(Token::wrap(RawValue::Token(Box::new(word)), Some(TokenType::Number), Position::default()).is_err());
}

#[test]
fn wrap_rejects_oversized_lists_in_any_shape() {
    let flat = RawValue::List(vec![RawValue::Number(0.0); 1001]);
    let nested = RawValue::List(vec![RawValue::List(vec![RawValue::Number(0.0); 600]); 2]);
    let deep = RawValue::List(vec![RawValue::List(vec![RawValue::List(vec![RawValue::Number(0.0); 11]); 10]); 10]);

    for raw in [flat, nested, deep] {
        let error = Token::wrap(raw, None, Position::default()).unwrap_err();
        assert_eq!(error.kind, EvaluationErrorKind::OversizedCollection);
    }

    assert!(Token::wrap(RawValue::List(vec![RawValue::Number(0.0); 1000]), None, Position::default()).is_ok());
}

#[test]
fn random_variable_draws_uniformly() {
    let mut candidates = Lazylist::new();
    candidates.append_range(Range::new(1.0, 5.0, None).unwrap());
    let mut variable = RandomVariable::new("a", candidates, false).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..4000 {
        let value = variable.instantiate(&mut rng).unwrap().to_string();
        *counts.entry(value).or_default() += 1;
    }

    assert_eq!(counts.len(), 4);
    for (value, count) in counts {
        assert!((800..1200).contains(&count), "value {value} drawn {count} times");
    }
}

#[test]
fn permutations_keep_their_elements() {
    let mut candidates = Lazylist::new();
    for n in [3.0, 1.0, 2.0] {
        candidates.append_value(number(n));
    }
    let mut variable = RandomVariable::new("p", candidates, true).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    assert_eq!(variable.how_many(), 6);
    assert_eq!(variable.get_instantiated_definition(), "");

    let value = variable.instantiate(&mut rng).unwrap().to_string();
    let mut elements = value.trim_matches(|c| c == '[' || c == ']').split(", ").collect::<Vec<_>>();
    elements.sort_unstable();
    assert_eq!(elements, ["1", "2", "3"]);
    assert!(variable.get_instantiated_definition().starts_with("p = ["));
}

#[test]
fn random_layer_defines_and_instantiates() {
    let mut evaluator = Evaluator::new();
    evaluator.evaluate_text("a = {1:4}; p = shuffle([1, 2, 3]); s = {\"x\", \"y\"}").unwrap();

    assert_eq!(evaluator.random_variables().len(), 3);
    assert_eq!(evaluator.how_many_datasets(), 3 * 6 * 2);

    let error = evaluator.evaluate_text("a + 1").unwrap_err();
    assert!(error.to_string().ends_with("Random variable 'a' has not been instantiated."));

    evaluator.instantiate_random_variables(&mut StdRng::seed_from_u64(9));
    evaluator.push_scope(ScopeLayer::Global);
    let a = evaluator.evaluate_text("a").unwrap()[0].as_number().unwrap();
    assert!([1.0, 2.0, 3.0].contains(&a));

    let stored = evaluator.export_randomvars_for_storage();
    let mut restored = Evaluator::new();
    restored.push_scope(ScopeLayer::Global);
    restored.evaluate_text(&stored).unwrap();

    assert_eq!(restored.evaluate_text("a").unwrap()[0].as_number(), Some(a));
    assert_eq!(restored.evaluate_text("len(p)").unwrap()[0].as_number(), Some(3.0));
    assert_eq!(restored.evaluate_text("s").unwrap()[0].kind(), TokenType::String);
}

#[test]
fn empty_sets_cannot_be_random_variables() {
    let mut evaluator = Evaluator::new();
    assert!(evaluator.evaluate_text("a = {1:1}").is_err());
    assert_eq!(Evaluator::new().how_many_datasets(), 1);
}
