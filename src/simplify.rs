//! Algebraic simplification of short-circuit expressions.
//!
//! Recognised shapes, with `OP` any of `&&`, `||`, `??`:
//!
//! ```text
//! x OP x                              → x                    tautology
//! X || (X && Y), X && (X || Y)        → X                    absorption
//! (X OP A) OP2 (X OP B)               → X OP (A OP2 B)       distribution
//! (Q ? A : F) OP (Q ? B : F)          → Q ? (A OP B) : F     ternary fold
//! (Q ? A : F) OP (!Q ? B : F)         → Q ? (A OP F) : B     ternary fold, OP in || ??
//! (!Q ? A : F) OP (Q ? B : F)         → Q ? B : (A OP F)     ternary fold, OP in || ??
//! (Q1 ? A : F) || (Q2 ? B : F)        → Q1 && A ? A : Q2 ? B : F
//! ```
//!
//! `F` must be `null` or `undefined`, written identically on both sides.
//! Operands are compared token by token; nothing here reasons about values,
//! so anything outside these shapes is left alone. Subexpressions evaluated
//! a different number of times after the rewrite must be pure.
//!
//! Replacement text is stitched together from the original operand sources
//! and is always a single line.

use std::borrow::Cow;

use crate::{
    ast::{Expr, ExprId, LogicalOp, Precedence, Program, UnaryOp, needs_parens},
    equivalence::expressions_equivalent,
};

/// Boolean-algebra law behind a simplification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Law {
    Tautology,
    Absorption,
    Distribution,
    TernaryFold,
}

impl Law {
    /// Stable diagnostic identifier.
    pub fn message_id(self) -> &'static str {
        match self {
            Law::Tautology => "tautology",
            Law::Absorption => "absorption",
            Law::Distribution => "distribution",
            Law::TernaryFold => "ternary-fold",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simplification {
    pub law: Law,
    pub replacement: String,
    /// Binding strength of `replacement`
    pub precedence: Precedence,
}

/// Try every law on a logical expression. `None` when no shape matches.
pub fn simplify(program: &Program, id: ExprId) -> Option<Simplification> {
    let Expr::Logical { op, left, right } = program.expr(id).kind else {
        return None;
    };

    tautology(program, left, right)
        .or_else(|| absorption(program, op, left, right))
        .or_else(|| distribution(program, op, left, right))
        .or_else(|| ternary_fold(program, op, left, right))
}

/// `x OP x` → `x`
fn tautology(program: &Program, left: ExprId, right: ExprId) -> Option<Simplification> {
    match (&program.expr(left).kind, &program.expr(right).kind) {
        (Expr::Identifier(a), Expr::Identifier(b)) if a == b => Some(Simplification {
            law: Law::Tautology,
            replacement: a.clone(),
            precedence: Precedence::Primary,
        }),
        _ => None,
    }
}

/// `X OP (X DUAL Y)` → `X`
fn absorption(
    program: &Program,
    op: LogicalOp,
    left: ExprId,
    right: ExprId,
) -> Option<Simplification> {
    let dual = op.dual()?;
    let Expr::Logical {
        op: inner,
        left: inner_left,
        ..
    } = program.expr(right).kind
    else {
        return None;
    };
    if inner != dual
        || !program.is_pure(left)
        || !expressions_equivalent(program, left, inner_left)
    {
        return None;
    }

    Some(Simplification {
        law: Law::Absorption,
        replacement: program.expr_source(left).to_string(),
        precedence: program.precedence(left),
    })
}

/// `(X OP A) OUTER (X OP B)` → `X OP (A OUTER B)`
fn distribution(
    program: &Program,
    outer: LogicalOp,
    left: ExprId,
    right: ExprId,
) -> Option<Simplification> {
    let Expr::Logical {
        op,
        left: x1,
        right: a,
    } = program.expr(left).kind
    else {
        return None;
    };
    let Expr::Logical {
        op: other,
        left: x2,
        right: b,
    } = program.expr(right).kind
    else {
        return None;
    };
    if op != other || !program.is_pure(x1) || !expressions_equivalent(program, x1, x2) {
        return None;
    }

    let grouped = format!(
        "({} {} {})",
        operand(program, a, outer.precedence(), false),
        outer.as_str(),
        operand(program, b, outer.precedence(), true),
    );
    Some(Simplification {
        law: Law::Distribution,
        replacement: format!(
            "{} {} {}",
            operand(program, x1, op.precedence(), false),
            op.as_str(),
            grouped
        ),
        precedence: op.precedence(),
    })
}

struct Ternary {
    test: ExprId,
    consequent: ExprId,
    alternate: ExprId,
}

fn ternary(program: &Program, id: ExprId) -> Option<Ternary> {
    match program.expr(id).kind {
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => Some(Ternary {
            test,
            consequent,
            alternate,
        }),
        _ => None,
    }
}

fn ternary_fold(
    program: &Program,
    op: LogicalOp,
    left: ExprId,
    right: ExprId,
) -> Option<Simplification> {
    let first = ternary(program, left)?;
    let second = ternary(program, right)?;

    let fallback = first.alternate;
    if !program.is_nullish_literal(fallback)
        || !expressions_equivalent(program, fallback, second.alternate)
        || !program.is_pure(first.test)
        || !program.is_pure(second.test)
    {
        return None;
    }

    let test = test_operand(program, first.test);
    let fallback_text = program.expr_source(fallback);
    let fold = |replacement: String| Simplification {
        law: Law::TernaryFold,
        replacement,
        precedence: Precedence::Conditional,
    };

    if expressions_equivalent(program, first.test, second.test) {
        let joined = joined(program, op, first.consequent, second.consequent);
        return Some(fold(format!("{} ? {} : {}", test, joined, fallback_text)));
    }

    if negates(program, second.test, first.test) {
        // Q truthy leaves `A OP F`, Q falsy leaves `F OP B`, which is B
        // only when OP moves past a nullish left side
        return match op {
            LogicalOp::Or | LogicalOp::Nullish => {
                let joined = joined(program, op, first.consequent, fallback);
                Some(fold(format!(
                    "{} ? {} : {}",
                    test,
                    joined,
                    branch_operand(program, second.consequent)
                )))
            }
            LogicalOp::And => None,
        };
    }

    if negates(program, first.test, second.test) {
        // the same fold with the branches swapped
        return match op {
            LogicalOp::Or | LogicalOp::Nullish => {
                let joined = joined(program, op, first.consequent, fallback);
                Some(fold(format!(
                    "{} ? {} : {}",
                    test_operand(program, second.test),
                    branch_operand(program, second.consequent),
                    joined
                )))
            }
            LogicalOp::And => None,
        };
    }

    match op {
        LogicalOp::Or if program.is_pure(first.consequent) => {
            let value = branch_operand(program, first.consequent);
            Some(fold(format!(
                "{} && {} ? {} : {} ? {} : {}",
                operand(program, first.test, Precedence::LogicalAnd, false),
                operand(program, first.consequent, Precedence::LogicalAnd, true),
                value,
                test_operand(program, second.test),
                branch_operand(program, second.consequent),
                fallback_text,
            )))
        }
        LogicalOp::Or | LogicalOp::And | LogicalOp::Nullish => None,
    }
}

/// `negated` is `!base`
fn negates(program: &Program, negated: ExprId, base: ExprId) -> bool {
    match program.expr(negated).kind {
        Expr::Unary {
            op: UnaryOp::Not,
            argument,
        } => expressions_equivalent(program, argument, base),
        _ => false,
    }
}

/// `(A OP B)`
fn joined(program: &Program, op: LogicalOp, a: ExprId, b: ExprId) -> String {
    format!(
        "({} {} {})",
        operand(program, a, op.precedence(), false),
        op.as_str(),
        operand(program, b, op.precedence(), true)
    )
}

/// Operand source, grouped when it binds looser than its new parent allows.
fn operand(program: &Program, id: ExprId, parent: Precedence, right: bool) -> Cow<'_, str> {
    let text = program.expr_source(id);
    if needs_parens(program.precedence(id), parent, right) {
        Cow::Owned(format!("({})", text))
    } else {
        Cow::Borrowed(text)
    }
}

fn test_operand(program: &Program, id: ExprId) -> Cow<'_, str> {
    let text = program.expr_source(id);
    if program.precedence(id) <= Precedence::Conditional {
        Cow::Owned(format!("({})", text))
    } else {
        Cow::Borrowed(text)
    }
}

fn branch_operand(program: &Program, id: ExprId) -> Cow<'_, str> {
    operand(program, id, Precedence::Assignment, false)
}
