//! The rules host: walks a parsed program, feeds nodes to the engine and
//! collects reports with their fixes.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{
    ast::{Expr, ExprId, NodeRef, Precedence, Program, Span, Stmt, StmtId, UnaryOp},
    config::LintConfig,
    control_flow::{find_duplicate_returns, find_shared_tail, fix_dead_else, fix_try_catch_tail},
    fix::{Fix, TextEdit, apply_fixes},
    negate::{is_negatable, negation},
    parser::{ParseError, parse},
    returns::always_returns,
    simplify::simplify,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    DeMorgan,
    SimplifyLogic,
    NoElseReturn,
    NoDuplicateReturn,
    TryCatchTail,
}

impl RuleId {
    pub const ALL: [RuleId; 5] = [
        RuleId::DeMorgan,
        RuleId::SimplifyLogic,
        RuleId::NoElseReturn,
        RuleId::NoDuplicateReturn,
        RuleId::TryCatchTail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::DeMorgan => "de-morgan",
            RuleId::SimplifyLogic => "simplify-logic",
            RuleId::NoElseReturn => "no-else-return",
            RuleId::NoDuplicateReturn => "no-duplicate-return",
            RuleId::TryCatchTail => "try-catch-tail",
        }
    }
}

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rule: RuleId,
    /// Stable identifier of the diagnostic within its rule
    pub message_id: &'static str,
    pub message: String,
    /// Anchor node
    pub span: Span,
    /// Applied by `--fix`
    pub fix: Option<Fix>,
    /// Offered, never applied automatically
    pub suggestions: Vec<Fix>,
}

impl Report {
    fn new(rule: RuleId, message_id: &'static str, message: impl Into<String>, span: Span) -> Self {
        Report {
            rule,
            message_id,
            message: message.into(),
            span,
            fix: None,
            suggestions: Vec::new(),
        }
    }

    fn with_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }
}

/// Result of [`Linter::fix_source`].
#[derive(Debug, Clone, PartialEq)]
pub struct FixOutcome {
    pub output: String,
    /// Rounds that applied at least one fix
    pub passes: usize,
    pub applied: usize,
    /// Reports still raised by the fixed output
    pub remaining: Vec<Report>,
}

pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Linter { config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Run every enabled rule. Reports come back ordered by position.
    pub fn lint(&self, program: &Program) -> Vec<Report> {
        let mut reports = Vec::new();
        for rule in RuleId::ALL {
            if !self.config.is_enabled(rule) {
                continue;
            }
            let before = reports.len();
            match rule {
                RuleId::DeMorgan => de_morgan(program, &mut reports),
                RuleId::SimplifyLogic => simplify_logic(program, &mut reports),
                RuleId::NoElseReturn => no_else_return(program, &mut reports),
                RuleId::NoDuplicateReturn => no_duplicate_return(program, &mut reports),
                RuleId::TryCatchTail => try_catch_tail(program, &mut reports),
            }
            for report in &reports[before..] {
                let (line, column) = program.line_col(report.span.start);
                debug!(
                    rule = rule.as_str(),
                    message_id = report.message_id,
                    line,
                    column,
                    fixable = report.fix.is_some(),
                    "report"
                );
            }
        }
        reports.sort_by_key(|r| (r.span.start, r.rule));
        reports
    }

    pub fn lint_source(&self, source: &str) -> Result<Vec<Report>, ParseError> {
        Ok(self.lint(&parse(source)?))
    }

    /// Lint, apply every non-overlapping fix, re-parse and repeat until
    /// nothing changes or `max-fix-passes` rounds have run.
    pub fn fix_source(&self, source: &str) -> Result<FixOutcome, ParseError> {
        let mut program = parse(source)?;
        let mut passes = 0;
        let mut applied = 0;

        loop {
            let reports = self.lint(&program);
            if passes >= self.config.max_fix_passes {
                return Ok(FixOutcome {
                    output: program.source().to_string(),
                    passes,
                    applied,
                    remaining: reports,
                });
            }

            let fixes: Vec<Fix> = reports.iter().filter_map(|r| r.fix.clone()).collect();
            let (fixed, count) = apply_fixes(program.source(), &fixes);
            if count == 0 || fixed == program.source() {
                return Ok(FixOutcome {
                    output: program.source().to_string(),
                    passes,
                    applied,
                    remaining: reports,
                });
            }

            match parse(&fixed) {
                Ok(next) => program = next,
                Err(error) => {
                    warn!(
                        %error,
                        pass = passes + 1,
                        "fixed source no longer parses, keeping previous round"
                    );
                    return Ok(FixOutcome {
                        output: program.source().to_string(),
                        passes,
                        applied,
                        remaining: reports,
                    });
                }
            }
            passes += 1;
            applied += count;
        }
    }
}

impl Default for Linter {
    fn default() -> Self {
        Linter::new(LintConfig::default())
    }
}

/// Replacement text for `id`, grouped when its new binding strength does
/// not fit the surrounding expression.
fn replace_expr(program: &Program, id: ExprId, text: String, precedence: Precedence) -> Fix {
    let text = if program.replacement_needs_parens(id, precedence) {
        format!("({})", text)
    } else {
        text
    };
    Fix::single(TextEdit::replace(program.expr(id).span, text))
}

fn is_not(program: &Program, id: ExprId) -> bool {
    matches!(
        program.expr(id).kind,
        Expr::Unary {
            op: UnaryOp::Not,
            ..
        }
    )
}

fn de_morgan(program: &Program, reports: &mut Vec<Report>) {
    for id in program.expr_ids() {
        let Expr::Unary {
            op: UnaryOp::Not,
            argument,
        } = program.expr(id).kind
        else {
            continue;
        };

        // `!!x` coerces to boolean and is left alone
        let inside_not = matches!(
            program.parent(NodeRef::Expr(id)),
            Some(NodeRef::Expr(parent)) if is_not(program, parent)
        );
        if inside_not || is_not(program, argument) {
            continue;
        }

        let (message_id, message) = match &program.expr(argument).kind {
            Expr::Logical { .. } => (
                "negated-logical",
                "Negated logical expression can be distributed with De Morgan's law",
            ),
            Expr::Binary { .. } => (
                "negated-comparison",
                "Negated comparison can use the complementary operator",
            ),
            _ => continue,
        };
        if !is_negatable(program, argument) {
            trace!(offset = program.expr(id).span.start, "operator has no negation");
            continue;
        }

        let (text, precedence) = negation(program, argument);
        let fix = replace_expr(program, id, text, precedence);
        reports.push(
            Report::new(RuleId::DeMorgan, message_id, message, program.expr(id).span)
                .with_fix(Some(fix)),
        );
    }
}

fn simplify_logic(program: &Program, reports: &mut Vec<Report>) {
    for id in program.expr_ids() {
        let Some(simplification) = simplify(program, id) else {
            continue;
        };
        let message = format!(
            "Expression can be simplified to `{}`",
            simplification.replacement
        );
        let fix = replace_expr(
            program,
            id,
            simplification.replacement,
            simplification.precedence,
        );
        reports.push(
            Report::new(
                RuleId::SimplifyLogic,
                simplification.law.message_id(),
                message,
                program.expr(id).span,
            )
            .with_fix(Some(fix)),
        );
    }
}

fn no_else_return(program: &Program, reports: &mut Vec<Report>) {
    for id in program.stmt_ids() {
        let Stmt::If {
            consequent,
            alternate: Some(_),
            ..
        } = program.stmt(id).kind
        else {
            continue;
        };
        if !always_returns(program, Some(consequent)) {
            continue;
        }

        let consequent_end = program.stmt(consequent).span.end;
        let anchor = match program.token_at_or_after(consequent_end) {
            Some(token) if token.is_keyword("else") => token.span,
            _ => program.stmt(id).span,
        };
        reports.push(
            Report::new(
                RuleId::NoElseReturn,
                "unnecessary-else",
                "Unnecessary 'else' after 'return'",
                anchor,
            )
            .with_fix(fix_dead_else(program, id)),
        );
    }
}

fn no_duplicate_return(program: &Program, reports: &mut Vec<Report>) {
    for body in program.function_bodies() {
        for duplicate in find_duplicate_returns(program, body) {
            let mut guard = Report::new(
                RuleId::NoDuplicateReturn,
                "redundant-guard",
                "This early return repeats the code that follows it",
                program.stmt(duplicate.guard).span,
            );
            guard.suggestions.push(duplicate.suggestion);
            reports.push(guard);
            reports.push(Report::new(
                RuleId::NoDuplicateReturn,
                "duplicate-tail",
                "Duplicates the early return above",
                duplicate.tail,
            ));
        }
    }
}

fn try_catch_tail(program: &Program, reports: &mut Vec<Report>) {
    for id in program.stmt_ids() {
        if !matches!(program.stmt(id).kind, Stmt::Try { .. }) {
            continue;
        }
        let Some(shared) = find_shared_tail(program, id) else {
            continue;
        };
        let anchor = try_keyword(program, id);
        reports.push(
            Report::new(
                RuleId::TryCatchTail,
                "hoist-to-finally",
                format!(
                    "`{}` ends both the try block and the catch handler; move it to finally",
                    program.stmt_text(shared.try_tail)
                ),
                anchor,
            )
            .with_fix(fix_try_catch_tail(program, id, &shared)),
        );
    }
}

fn try_keyword(program: &Program, id: StmtId) -> Span {
    let span = program.stmt(id).span;
    program
        .tokens_in(span)
        .first()
        .map(|t| t.span)
        .unwrap_or(span)
}
