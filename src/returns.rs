//! Conservative "leaves via `return`" predicates.
//!
//! Two variants exist and differ only in how an absent statement (a missing
//! `else`, a missing `catch`) is judged:
//!
//! - [`always_returns`] is strict: absent means "does not return". The
//!   dead-`else` rule relies on it.
//! - [`guard_always_returns`] is lenient: an `if` without `else` is judged by
//!   its consequent alone. Duplicate-return detection relies on it.
//!
//! Neither is a reachability analysis. A block returns as soon as any of its
//! statements does, and a loop is judged by its body even though the body
//! may run zero times.

use crate::ast::{Program, Stmt, StmtId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Missing {
    Fails,
    Passes,
}

/// Does `stmt` unconditionally leave via `return`? `None` is `false`.
///
/// # Examples
/// - `{ return 1; }` → `true`
/// - `{ if (a) return 1; }` → `false`
/// - `{ try { return 1; } catch { return 2; } }` → `true`
/// - `{ try {} finally { return 1; } }` → `true`
pub fn always_returns(program: &Program, stmt: Option<StmtId>) -> bool {
    match stmt {
        Some(stmt) => returns(program, stmt, Missing::Fails),
        None => false,
    }
}

/// Lenient variant of [`always_returns`]: an absent `else` branch is
/// treated as returning.
///
/// # Examples
/// - `if (a) return 1;` → `true`
/// - `if (a) { foo(); }` → `false`
pub fn guard_always_returns(program: &Program, stmt: Option<StmtId>) -> bool {
    match stmt {
        Some(stmt) => returns(program, stmt, Missing::Passes),
        None => false,
    }
}

fn branch(program: &Program, stmt: Option<StmtId>, missing: Missing) -> bool {
    match stmt {
        Some(stmt) => returns(program, stmt, missing),
        None => missing == Missing::Passes,
    }
}

fn returns(program: &Program, stmt: StmtId, missing: Missing) -> bool {
    match &program.stmt(stmt).kind {
        Stmt::Return(_) => true,

        Stmt::Block(body) => body.iter().any(|s| returns(program, *s, missing)),

        Stmt::If {
            consequent,
            alternate,
            ..
        } => returns(program, *consequent, missing) && branch(program, *alternate, missing),

        Stmt::For { body, .. }
        | Stmt::ForIn { body, .. }
        | Stmt::ForOf { body, .. }
        | Stmt::While { body, .. }
        | Stmt::DoWhile { body, .. } => returns(program, *body, missing),

        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            if finalizer.is_some_and(|f| returns(program, f, missing)) {
                return true;
            }
            // an absent handler is a failing branch in both variants
            let handled = handler
                .as_ref()
                .is_some_and(|h| returns(program, h.body, missing));
            returns(program, *block, missing) && handled
        }

        Stmt::Expression(_)
        | Stmt::VariableDeclaration { .. }
        | Stmt::FunctionDeclaration { .. }
        | Stmt::Throw(_)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Switch { .. }
        | Stmt::Labeled { .. }
        | Stmt::Empty
        | Stmt::Opaque => false,
    }
}
