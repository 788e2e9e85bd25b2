//! Edits for redundant control flow.
//!
//! Each synthesizer works on raw source ranges: statements are moved by
//! slicing their text, re-indented line by line, never reprinted. All edits
//! of one [`Fix`] stay inside the statement being rewritten.

use std::borrow::Cow;

use regex::Regex;
use tracing::trace;

use crate::{
    ast::{DeclKind, Expr, Program, Span, Stmt, StmtId, TokenKind},
    equivalence::{sequences_equivalent, statements_equivalent},
    fix::{Fix, TextEdit},
    returns::guard_always_returns,
};

/// Replace the leading `from` indentation of every line after the first.
fn reindent(text: &str, from: &str, to: &str) -> String {
    if from == to || !text.contains('\n') {
        return text.to_string();
    }
    let (first, rest) = text.split_at(text.find('\n').unwrap_or(text.len()));
    match Regex::new(&format!("(?m)^{}", regex::escape(from))) {
        Ok(pattern) => format!("{}{}", first, pattern.replace_all(rest, regex::NoExpand(to))),
        Err(_) => text.to_string(),
    }
}

/// Statements directly inside a block, or the statement itself.
fn statement_list(program: &Program, stmt: StmtId) -> Cow<'_, [StmtId]> {
    match &program.stmt(stmt).kind {
        Stmt::Block(body) => Cow::Borrowed(body.as_slice()),
        _ => Cow::Owned(vec![stmt]),
    }
}

/// Would moving `stmt` into the enclosing scope change what its names
/// refer to?
fn declares_scoped_name(program: &Program, stmt: StmtId) -> bool {
    match &program.stmt(stmt).kind {
        Stmt::VariableDeclaration { kind, .. } => matches!(kind, DeclKind::Let | DeclKind::Const),
        Stmt::FunctionDeclaration { .. } | Stmt::Opaque => true,
        _ => false,
    }
}

fn on_same_line(program: &Program, a: usize, b: usize) -> bool {
    program.line_start(a) == program.line_start(b)
}

/// Does `stmt` end in an expression with no `;` after it, so that a
/// following line may be read as its continuation?
fn left_open(program: &Program, stmt: StmtId) -> bool {
    let last = program.token_before(program.stmt(stmt).span.end);
    if last.is_some_and(|t| t.is_punct(";")) {
        return false;
    }
    match &program.stmt(stmt).kind {
        Stmt::Expression(_)
        | Stmt::Return(Some(_))
        | Stmt::Throw(_)
        | Stmt::VariableDeclaration { .. } => true,
        Stmt::If {
            consequent,
            alternate,
            ..
        } => left_open(program, alternate.unwrap_or(*consequent)),
        Stmt::For { body, .. }
        | Stmt::ForIn { body, .. }
        | Stmt::ForOf { body, .. }
        | Stmt::While { body, .. }
        | Stmt::Labeled { body, .. } => left_open(program, *body),
        Stmt::Opaque => !last.is_some_and(|t| t.is_punct("}")),
        _ => false,
    }
}

/// Text moved to follow `previous`, with a leading `;` when it would
/// otherwise continue `previous`'s expression.
fn separated<'a>(program: &Program, previous: StmtId, text: &'a str) -> Cow<'a, str> {
    if left_open(program, previous) && text.starts_with(['(', '[', '`', '+', '-', '/']) {
        trace!(stmt = previous.0, "prefixing moved statement with ';'");
        Cow::Owned(format!(";{}", text))
    } else {
        Cow::Borrowed(text)
    }
}

/// Drop the `else` of an `if` whose consequent always returns and place the
/// alternate's statements right after the `if`, unwrapped from their block
/// and re-indented to the `if`'s column.
///
/// ```text
/// if (cond) return 'ok'; else foo();   →   if (cond) return 'ok'; foo();
/// ```
///
/// Returns `None` when the rewrite is not safe: the `if` is not directly in
/// a statement list, comments sit in the rewritten region, or the alternate
/// declares block-scoped names that would leak into the enclosing scope.
pub fn fix_dead_else(program: &Program, if_stmt: StmtId) -> Option<Fix> {
    let Stmt::If {
        consequent,
        alternate: Some(alternate),
        ..
    } = program.stmt(if_stmt).kind
    else {
        return None;
    };

    let consequent_end = program.stmt(consequent).span.end;
    let alternate_span = program.stmt(alternate).span;
    let region = Span::new(consequent_end, alternate_span.end);

    if !program.in_statement_list(if_stmt) {
        trace!(offset = region.start, "dead else not in a statement list");
        return None;
    }
    if program.has_comments_in(region) {
        trace!(offset = region.start, "dead else region holds comments");
        return None;
    }

    let moved = statement_list(program, alternate);
    if moved.iter().any(|s| declares_scoped_name(program, *s)) {
        trace!(offset = region.start, "dead else declares block-scoped names");
        return None;
    }

    let (Some(first), Some(last)) = (moved.first(), moved.last()) else {
        return Some(Fix::single(TextEdit::remove(region)));
    };
    let first_start = program.stmt(*first).span.start;
    let inner = separated(
        program,
        consequent,
        program.text(Span::new(first_start, program.stmt(*last).span.end)),
    );

    let replacement = if on_same_line(program, consequent_end, first_start) && !inner.contains('\n')
    {
        format!(" {}", inner)
    } else {
        let indent = program.indent_at(program.stmt(if_stmt).span.start);
        let from = program.indent_at(first_start);
        format!("\n{}{}", indent, reindent(&inner, from, indent))
    };
    Some(Fix::single(TextEdit::replace(region, replacement)))
}

/// An early-return guard whose body repeats the code that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateReturn {
    /// The guarding `if`
    pub guard: StmtId,
    /// Statements after the guard, duplicated by its consequent
    pub tail: Span,
    /// Removes the guard; an impure test is kept as an expression statement
    pub suggestion: Fix,
}

/// Find guards in a function body of the shape
///
/// ```text
/// if (test) { S; return x; }
/// S; return x;
/// ```
///
/// where the guard's consequent always returns and is token-for-token the
/// rest of the body (trailing bare `return;` ignored on both sides).
pub fn find_duplicate_returns(program: &Program, body: &[StmtId]) -> Vec<DuplicateReturn> {
    let mut found = Vec::new();
    for (index, stmt) in body.iter().enumerate() {
        let Stmt::If {
            test,
            consequent,
            alternate: None,
        } = program.stmt(*stmt).kind
        else {
            continue;
        };
        let rest = &body[index + 1..];
        let (Some(next), Some(last)) = (rest.first(), rest.last()) else {
            continue;
        };
        if !guard_always_returns(program, Some(consequent)) {
            continue;
        }
        let guarded = statement_list(program, consequent);
        if !sequences_equivalent(program, &guarded, rest) {
            continue;
        }

        let guard_span = program.stmt(*stmt).span;
        let next_start = program.stmt(*next).span.start;
        let removal = Span::new(guard_span.start, next_start);
        let replacement = if program.is_pure(test) {
            String::new()
        } else {
            let test_text = program.expr_text(test);
            let statement = match program.expr(test).kind {
                Expr::Object(_) | Expr::Function { .. } | Expr::Opaque => {
                    format!("({});", test_text)
                }
                _ => format!("{};", test_text),
            };
            format!(
                "{}{}",
                statement,
                program.text(Span::new(guard_span.end, next_start))
            )
        };

        found.push(DuplicateReturn {
            guard: *stmt,
            tail: Span::new(next_start, program.stmt(*last).span.end),
            suggestion: Fix::single(TextEdit::replace(removal, replacement)),
        });
    }
    found
}

/// A `try` whose block and `catch` handler end with the same statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedTail {
    pub try_tail: StmtId,
    pub catch_tail: StmtId,
}

/// Detect a statement ending both the `try` block and its handler.
///
/// Jumps (`return`, `throw`, `break`, `continue`) and declarations are not
/// reported: inside `finally` they would behave differently.
pub fn find_shared_tail(program: &Program, try_stmt: StmtId) -> Option<SharedTail> {
    let Stmt::Try {
        block,
        handler: Some(handler),
        ..
    } = &program.stmt(try_stmt).kind
    else {
        return None;
    };
    let try_tail = *statement_list(program, *block).last()?;
    let catch_tail = *statement_list(program, handler.body).last()?;

    let movable = match &program.stmt(try_tail).kind {
        Stmt::Return(_) | Stmt::Throw(_) | Stmt::Break(_) | Stmt::Continue(_) => false,
        Stmt::VariableDeclaration { .. }
        | Stmt::FunctionDeclaration { .. }
        | Stmt::Opaque
        | Stmt::Empty => false,
        _ => true,
    };
    if !movable || !statements_equivalent(program, try_tail, catch_tail) {
        return None;
    }
    Some(SharedTail {
        try_tail,
        catch_tail,
    })
}

/// Range removing `tail` from its block: from the end of the last non-empty
/// statement before it to the end of `tail`. A block left with nothing but
/// lone `;` is emptied to `{}`.
fn tail_removal(program: &Program, block: StmtId, tail: StmtId) -> Span {
    let body = statement_list(program, block);
    let previous = body
        .iter()
        .rev()
        .skip(1)
        .find(|s| !matches!(program.stmt(**s).kind, Stmt::Empty));
    match previous {
        Some(previous) => Span::new(program.stmt(*previous).span.end, program.stmt(tail).span.end),
        None => {
            let span = program.stmt(block).span;
            Span::new(span.start + 1, span.end - 1)
        }
    }
}

/// Move the shared tail into `finally`: remove it from the `try` block and
/// from the handler, then append it once, after the current content of an
/// existing `finally` or inside a new `finally { ... }`.
pub fn fix_try_catch_tail(program: &Program, try_stmt: StmtId, shared: &SharedTail) -> Option<Fix> {
    let Stmt::Try {
        block,
        handler: Some(handler),
        finalizer,
    } = &program.stmt(try_stmt).kind
    else {
        return None;
    };

    // a catch parameter is out of scope in `finally`
    if let Some(param) = handler.param {
        let bound: Vec<&str> = program
            .tokens_in(program.expr(param).span)
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
            .collect();
        let uses_param = program
            .tokens_in(program.stmt(shared.catch_tail).span)
            .iter()
            .any(|t| t.kind == TokenKind::Identifier && bound.contains(&t.text.as_str()));
        if uses_param {
            trace!(stmt = try_stmt.0, "shared tail uses the catch parameter");
            return None;
        }
    }

    let try_removal = tail_removal(program, *block, shared.try_tail);
    let catch_removal = tail_removal(program, handler.body, shared.catch_tail);
    if program.has_comments_in(try_removal) || program.has_comments_in(catch_removal) {
        trace!(stmt = try_stmt.0, "shared tail region holds comments");
        return None;
    }

    let try_span = program.stmt(try_stmt).span;
    let tail_span = program.stmt(shared.try_tail).span;
    let tail_text = program.text(tail_span);
    let tail_indent = program.indent_at(tail_span.start);
    let try_indent = program.indent_at(try_span.start);
    let multi_line = program.text(try_span).contains('\n');

    let insertion = match finalizer {
        Some(finalizer) => {
            let finally_span = program.stmt(*finalizer).span;
            match statement_list(program, *finalizer).last() {
                Some(last) => {
                    let last_span = program.stmt(*last).span;
                    let moved = separated(program, *last, tail_text);
                    let text = if on_same_line(program, last_span.start, finally_span.end) {
                        format!(" {}", moved)
                    } else {
                        let indent = program.indent_at(last_span.start);
                        format!("\n{}{}", indent, reindent(&moved, tail_indent, indent))
                    };
                    TextEdit::insert(last_span.end, text)
                }
                None if on_same_line(program, finally_span.start, finally_span.end) => {
                    TextEdit::insert(finally_span.end - 1, format!(" {} ", tail_text))
                }
                None => TextEdit::insert(
                    finally_span.start + 1,
                    format!("\n{}{}", tail_indent, tail_text),
                ),
            }
        }
        None => {
            let handler_end = program.stmt(handler.body).span.end;
            let text = if multi_line {
                format!(" finally {{\n{}{}\n{}}}", tail_indent, tail_text, try_indent)
            } else {
                format!(" finally {{ {} }}", tail_text)
            };
            TextEdit::insert(handler_end, text)
        }
    };

    Some(Fix::new(vec![
        TextEdit::remove(try_removal),
        TextEdit::remove(catch_removal),
        insertion,
    ]))
}
