use logic_lint::{
    ast::{Expr, Program, StmtId},
    equivalence::{
        expressions_equivalent, sequences_equivalent, statements_equivalent, token_eq,
        tokens_equivalent,
    },
    lexer::Lexer,
    parser::{parse, parse_expression_source},
};

fn tokens(source: &str) -> Vec<logic_lint::Token> {
    let (mut tokens, _) = Lexer::new(source).tokenize().unwrap();
    tokens.pop(); // eof
    tokens
}

/// Top-level statements of `a` and `b`, parsed as one program.
fn two_sequences(a: &str, b: &str) -> (Program, Vec<StmtId>, Vec<StmtId>) {
    let program = parse(&format!("{}\n{}", a, b)).unwrap();
    let split = parse(a).unwrap().body().len();
    let (left, right) = program.body().split_at(split);
    let (left, right) = (left.to_vec(), right.to_vec());
    (program, left, right)
}

#[test]
fn test_strings_compare_by_value() {
    let single = tokens("'foo'");
    let double = tokens("\"foo\"");
    let other = tokens("'bar'");
    let escaped = tokens("'\\x66oo'");

    assert!(token_eq(&single[0], &double[0]));
    assert!(token_eq(&single[0], &escaped[0]));
    assert!(!token_eq(&single[0], &other[0]));
}

#[test]
fn test_other_tokens_compare_by_text() {
    assert!(tokens_equivalent(&tokens("a.b(1)"), &tokens("a . b ( 1 )")));
    assert!(!tokens_equivalent(&tokens("0x10"), &tokens("16")));
    assert!(!tokens_equivalent(&tokens("a"), &tokens("'a'")));
    assert!(!tokens_equivalent(&tokens("a b"), &tokens("a")));
}

#[test]
fn test_sequences_with_differently_quoted_strings() {
    let (program, a, b) = two_sequences("return 'foo';", "return \"foo\";");
    assert!(sequences_equivalent(&program, &a, &b));

    let (program, a, b) = two_sequences("return 'foo';", "return 'bar';");
    assert!(!sequences_equivalent(&program, &a, &b));
}

#[test]
fn test_trailing_bare_return_is_ignored() {
    let (program, a, b) = two_sequences("foo(); return;", "foo();");
    assert!(sequences_equivalent(&program, &a, &b));

    let (program, a, b) = two_sequences("return;", "");
    assert!(sequences_equivalent(&program, &a, &b));

    // only a trailing one
    let (program, a, b) = two_sequences("return; foo();", "foo();");
    assert!(!sequences_equivalent(&program, &a, &b));
}

#[test]
fn test_comments_and_layout_do_not_matter() {
    let (program, a, b) = two_sequences("foo(/* x */ 1);\nbar();", "foo(1); bar();");
    assert!(sequences_equivalent(&program, &a, &b));
}

#[test]
fn test_statement_semicolons_count() {
    // the trailing `;` is part of the statement's tokens
    let (program, a, b) = two_sequences("foo();", "foo()");
    assert!(!statements_equivalent(&program, a[0], b[0]));
    assert!(statements_equivalent(&program, a[0], a[0]));
}

#[test]
fn test_expressions_ignore_enclosing_parentheses() {
    let (program, id) = parse_expression_source("(a && b) || a && b").unwrap();
    let Expr::Logical { left, right, .. } = program.expr(id).kind else {
        panic!("Expected ||");
    };
    assert!(expressions_equivalent(&program, left, right));
}
