// tests/lexer_tests.rs

use logic_lint::ast::TokenKind;
use logic_lint::lexer::{LexError, Lexer};

fn texts(source: &str) -> Vec<String> {
    let (tokens, _) = Lexer::new(source).tokenize().unwrap();
    tokens.into_iter().map(|t| t.text).collect()
}

// ============================================================================
// Punctuators
// ============================================================================

#[test]
fn test_longest_match_punctuators() {
    let test_cases = vec![
        ("a >>>= b", ">>>="),
        ("a === b", "==="),
        ("a !== b", "!=="),
        ("a ?? b", "??"),
        ("a ??= b", "??="),
        ("a?.b", "?."),
        ("(a) => a", "=>"),
        ("...a", "..."),
        ("a ** b", "**"),
    ];

    for (input, expected) in test_cases {
        let tokens = texts(input);
        assert!(
            tokens.iter().any(|t| t == expected),
            "Failed for input: {} (got {:?})",
            input,
            tokens
        );
    }
}

#[test]
fn test_optional_chain_before_digit_is_conditional() {
    assert_eq!(texts("a?.5:b"), vec!["a", "?", ".5", ":", "b", ""]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_value_is_decoded() {
    let (single, _) = Lexer::new("'foo'").tokenize().unwrap();
    let (double, _) = Lexer::new("\"foo\"").tokenize().unwrap();

    assert_eq!(single[0].kind, TokenKind::String("foo".into()));
    assert_eq!(single[0].kind, double[0].kind);
    assert_ne!(single[0].text, double[0].text);
}

#[test]
fn test_string_escapes() {
    let (tokens, _) = Lexer::new(r#"'a\'b' "\x41B\u{43}" 'tab\t'"#)
        .tokenize()
        .unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String("a'b".into()));
    assert_eq!(tokens[1].kind, TokenKind::String("ABC".into()));
    assert_eq!(tokens[2].kind, TokenKind::String("tab\t".into()));
}

#[test]
fn test_unterminated_string() {
    let result = Lexer::new("'abc").tokenize();
    assert_eq!(result.unwrap_err(), LexError::UnterminatedString(0));
}

// ============================================================================
// Comments and line breaks
// ============================================================================

#[test]
fn test_comments_are_collected_separately() {
    let (tokens, comments) = Lexer::new("a // line\n/* block */ b").tokenize().unwrap();

    assert_eq!(tokens.len(), 3); // a, b, eof
    assert_eq!(comments.len(), 2);
    assert!(!comments[0].block);
    assert!(comments[1].block);
    assert_eq!(comments[1].text, "/* block */");
}

#[test]
fn test_newline_before_is_recorded() {
    let (tokens, _) = Lexer::new("return\nfoo").tokenize().unwrap();
    assert!(!tokens[0].newline_before);
    assert!(tokens[1].newline_before);
}

#[test]
fn test_unterminated_comment() {
    let result = Lexer::new("a /* never closed").tokenize();
    assert_eq!(result.unwrap_err(), LexError::UnterminatedComment(2));
}

// ============================================================================
// Regex vs division
// ============================================================================

#[test]
fn test_regex_after_operator() {
    let (tokens, _) = Lexer::new("x = /ab+c/gi.test(y)").tokenize().unwrap();
    assert_eq!(tokens[2].kind, TokenKind::Regex);
    assert_eq!(tokens[2].text, "/ab+c/gi");
}

#[test]
fn test_division_after_identifier() {
    let (tokens, _) = Lexer::new("a / b / c").tokenize().unwrap();
    assert_eq!(tokens[1].kind, TokenKind::Punctuator);
    assert_eq!(tokens[3].kind, TokenKind::Punctuator);
}

#[test]
fn test_regex_after_return() {
    let (tokens, _) = Lexer::new("return /[/]/").tokenize().unwrap();
    assert_eq!(tokens[1].kind, TokenKind::Regex);
    assert_eq!(tokens[1].text, "/[/]/");
}

// ============================================================================
// Templates and numbers
// ============================================================================

#[test]
fn test_template_is_one_token() {
    let (tokens, _) = Lexer::new("`a ${ {b: `c`}.b } d` + 1").tokenize().unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Template);
    assert_eq!(tokens[0].text, "`a ${ {b: `c`}.b } d`");
    assert_eq!(tokens[1].text, "+");
}

#[test]
fn test_numbers() {
    let tokens = texts("0x1F 1e-3 .5 10n 1_000");
    assert_eq!(tokens, vec!["0x1F", "1e-3", ".5", "10n", "1_000", ""]);
}

#[test]
fn test_unexpected_character() {
    let result = Lexer::new("a \\ b").tokenize();
    assert_eq!(
        result.unwrap_err(),
        LexError::UnexpectedChar { ch: '\\', offset: 2 }
    );
}
