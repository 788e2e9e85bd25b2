use crate::ast::{ExprId, Program, Stmt, StmtId, Token, TokenKind};

/// Token equality used for structural comparison: strings compare by decoded
/// value, so `'foo'` and `"foo"` are equal; every other token by exact text.
pub fn token_eq(a: &Token, b: &Token) -> bool {
    match (&a.kind, &b.kind) {
        (TokenKind::String(a), TokenKind::String(b)) => a == b,
        (TokenKind::String(_), _) | (_, TokenKind::String(_)) => false,
        _ => a.kind == b.kind && a.text == b.text,
    }
}

/// Same length, pairwise [`token_eq`].
pub fn tokens_equivalent(a: &[Token], b: &[Token]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| token_eq(a, b))
}

/// Compare two statement sequences by their flattened token streams,
/// ignoring trailing argument-less `return;` statements on either side.
///
/// # Examples
/// - `[return 'foo';]` vs `[return "foo";]` → `true`
/// - `[foo(); return;]` vs `[foo();]` → `true`
/// - `[return 'foo';]` vs `[return 'bar';]` → `false`
pub fn sequences_equivalent(program: &Program, a: &[StmtId], b: &[StmtId]) -> bool {
    let a = without_trailing_returns(program, a);
    let b = without_trailing_returns(program, b);
    let a: Vec<&Token> = a.iter().flat_map(|s| program.tokens_in(program.stmt(*s).span)).collect();
    let b: Vec<&Token> = b.iter().flat_map(|s| program.tokens_in(program.stmt(*s).span)).collect();
    a.len() == b.len() && a.iter().zip(&b).all(|(a, b)| token_eq(a, b))
}

pub fn statements_equivalent(program: &Program, a: StmtId, b: StmtId) -> bool {
    tokens_equivalent(
        program.tokens_in(program.stmt(a).span),
        program.tokens_in(program.stmt(b).span),
    )
}

/// Expressions compare without their enclosing parentheses.
pub fn expressions_equivalent(program: &Program, a: ExprId, b: ExprId) -> bool {
    tokens_equivalent(
        program.tokens_in(program.expr(a).span),
        program.tokens_in(program.expr(b).span),
    )
}

fn without_trailing_returns<'a>(program: &Program, mut stmts: &'a [StmtId]) -> &'a [StmtId] {
    while let [rest @ .., last] = stmts {
        if matches!(program.stmt(*last).kind, Stmt::Return(None)) {
            stmts = rest;
        } else {
            break;
        }
    }
    stmts
}
