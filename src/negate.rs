use crate::ast::{Expr, ExprId, LogicalOp, Precedence, Program, UnaryOp, needs_parens};

/// Source text denoting the logical negation of `id`, with `NOT` pushed one
/// algebraic step inward instead of prefixed.
///
/// # Examples
/// - `!foo` → `foo`
/// - `a === b` → `a !== b`
/// - `foo && 24` → `(!(foo) || !(24))`
/// - `!foo && bar > 24` → `(foo || bar <= 24)`
/// - anything else → `!(text)`
///
/// `??` and non-comparison binary operators fall back to `!(text)` as well;
/// rules consult [`is_negatable`] first and decline those shapes.
pub fn negate(program: &Program, id: ExprId) -> String {
    negation(program, id).0
}

/// Like [`negate`], also returning how tightly the produced text binds so
/// that callers can decide whether it needs grouping.
pub fn negation(program: &Program, id: ExprId) -> (String, Precedence) {
    match &program.expr(id).kind {
        Expr::Unary {
            op: UnaryOp::Not,
            argument,
        } => (
            program.expr_source(*argument).to_string(),
            program.precedence(*argument),
        ),

        Expr::Binary { op, left, right } => match op.complement() {
            Some(complement) => (
                format!(
                    "{} {} {}",
                    program.expr_source(*left),
                    complement.as_str(),
                    program.expr_source(*right)
                ),
                complement.precedence(),
            ),
            None => wrapped(program, id),
        },

        Expr::Logical { op, left, right } => match op.dual() {
            Some(dual) => {
                let left = negated_operand(program, *left, dual, false);
                let right = negated_operand(program, *right, dual, true);
                (
                    format!("({} {} {})", left, dual.as_str(), right),
                    Precedence::Primary,
                )
            }
            None => wrapped(program, id),
        },

        Expr::Unary { .. }
        | Expr::Identifier(_)
        | Expr::Literal(_)
        | Expr::This
        | Expr::Update { .. }
        | Expr::Conditional { .. }
        | Expr::Assignment { .. }
        | Expr::Member { .. }
        | Expr::Call { .. }
        | Expr::New { .. }
        | Expr::Array(_)
        | Expr::Object(_)
        | Expr::Function { .. }
        | Expr::Sequence(_)
        | Expr::Spread(_)
        | Expr::Opaque => wrapped(program, id),
    }
}

/// Whether [`negate`] performs an algebraic step on `id` rather than only
/// wrapping it. False for `??` and for arithmetic, bitwise, `in` and
/// `instanceof` operators.
pub fn is_negatable(program: &Program, id: ExprId) -> bool {
    match &program.expr(id).kind {
        Expr::Binary { op, .. } => op.is_comparison(),
        Expr::Logical { op, .. } => op.dual().is_some(),
        _ => true,
    }
}

fn negated_operand(program: &Program, id: ExprId, parent: LogicalOp, right: bool) -> String {
    let (text, precedence) = negation(program, id);
    if needs_parens(precedence, parent.precedence(), right) {
        format!("({})", text)
    } else {
        text
    }
}

fn wrapped(program: &Program, id: ExprId) -> (String, Precedence) {
    (format!("!({})", program.expr_text(id)), Precedence::Unary)
}
