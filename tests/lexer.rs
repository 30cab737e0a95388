use qformula::interpreter::{
    input_stream::Position,
    lexer::Lexer,
    token::{Token, TokenType},
};

fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).tokenize()
                    .unwrap_or_else(|e| panic!("Lexing '{text}' failed: {e}"))
}

fn lex_error(text: &str) -> String {
    match Lexer::new(text).tokenize() {
        Ok(tokens) => panic!("Lexing '{text}' succeeded with {} tokens but was expected to fail", tokens.len()),
        Err(e) => e.to_string(),
    }
}

fn kinds(text: &str) -> Vec<TokenType> {
    tokenize(text).iter().map(Token::kind).collect()
}

#[test]
fn numeric_literals_produce_one_number() {
    let cases = [("1E5", 100_000.0), (".12", 0.12), ("1e-2", 0.01), ("42", 42.0), ("2.5e+3", 2500.0), ("0.5", 0.5)];

    for (text, expected) in cases {
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), 1, "'{text}' should be a single token");
        assert_eq!(tokens[0].kind(), TokenType::Number);
        assert_eq!(tokens[0].as_number(), Some(expected), "value of '{text}'");
    }
}

#[test]
fn scientific_notation_keeps_its_parts() {
    let tokens = tokenize("2.5e-3");
    let notation = tokens[0].metadata().expect("scientific metadata");

    assert_eq!(notation.mantissa, "2.5");
    assert_eq!(notation.exponent, "-3");
    assert!(tokenize("2.5").first().and_then(Token::metadata).is_none());
}

#[test]
fn dangling_exponent_is_not_part_of_the_number() {
    let tokens = tokenize("1e");
    assert_eq!(tokens[0].as_number(), Some(1.0));
    assert_eq!(tokens[1].kind(), TokenType::Identifier);
    assert_eq!(tokens[1].as_str(), Some("e"));

    assert_eq!(kinds("2e+"), vec![TokenType::Number, TokenType::Identifier, TokenType::Operator]);
}

#[test]
fn operators_match_longest_first() {
    let tokens = tokenize("a**b<=c!=d && e<<2");
    let operators = tokens.iter()
                          .filter(|t| t.kind() == TokenType::Operator)
                          .filter_map(Token::as_str)
                          .collect::<Vec<_>>();

    assert_eq!(operators, ["**", "<=", "!=", "&&", "<<"]);
}

#[test]
fn identifiers_constants_and_reserved_words() {
    assert_eq!(kinds("for x_1 π pi"),
               vec![TokenType::ReservedWord, TokenType::Identifier, TokenType::Constant, TokenType::Identifier]);
    assert_eq!(kinds("\\sin(x)"),
               vec![TokenType::Prefix,
                    TokenType::Identifier,
                    TokenType::OpeningParen,
                    TokenType::Identifier,
                    TokenType::ClosingParen]);
}

#[test]
fn strings_and_escapes() {
    assert_eq!(tokenize(r#""a\"b""#)[0].as_str(), Some("a\"b"));
    assert_eq!(tokenize(r"'it\'s'")[0].as_str(), Some("it's"));
    assert_eq!(tokenize(r#""tab\there""#)[0].as_str(), Some("tab\there"));
    assert_eq!(tokenize(r#""""#)[0].kind(), TokenType::String);
}

#[test]
fn comments_and_whitespace_are_skipped() {
    assert_eq!(kinds("1 # the rest is ignored\n+ 3"),
               vec![TokenType::Number, TokenType::Operator, TokenType::Number]);
    assert!(tokenize("   # only a comment").is_empty());
}

#[test]
fn positions_are_row_and_column() {
    let tokens = tokenize("a +\n  bc");

    assert_eq!(tokens[0].position(), Position::new(1, 0));
    assert_eq!(tokens[1].position(), Position::new(1, 2));
    assert_eq!(tokens[2].position(), Position::new(2, 2));
}

#[test]
fn lexical_errors_are_positioned() {
    assert_eq!(lex_error("2 + $"), "1:4:Unexpected input: '$'");
    assert_eq!(lex_error("1.2.3"), "1:3:Unexpected input: '.'");
    assert!(lex_error("a + \"abc").ends_with("Unterminated string, started at row 1, column 4."));
}
