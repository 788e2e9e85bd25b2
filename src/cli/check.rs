//! Lint (and optionally fix) a JavaScript source

use tracing::{debug, warn};

use super::CliError;
use crate::{
    Linter, Value,
    ast::Program,
    config::LintConfig,
    evaluator::check_equivalence,
    lint::{Report, RuleId},
    output::{format_text, to_json, to_json_pretty},
    parser::parse,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// JavaScript source
    pub source: Option<String>,
    /// Name printed in text reports
    pub path: String,
    /// Print the fixed source instead of reports
    pub fix: bool,
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Re-check every logical rewrite with the reference evaluator
    pub verify: bool,
    pub config: LintConfig,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Rendered reports
    Reports { rendered: String, count: usize },
    /// Fixed source and the reports it still raises
    Fixed {
        source: String,
        applied: usize,
        remaining: usize,
    },
}

impl CheckResult {
    pub fn is_clean(&self) -> bool {
        match self {
            CheckResult::Reports { count, .. } => *count == 0,
            CheckResult::Fixed { remaining, .. } => *remaining == 0,
        }
    }
}

/// Rewrites from the logic rules that the evaluator proves wrong. Rewrites
/// the evaluator cannot run (calls, member reads) are skipped.
fn verify_rewrites(program: &Program, reports: &[Report]) -> usize {
    let domain = Value::standard_domain();
    let mut mismatches = 0;

    for report in reports {
        if !matches!(report.rule, RuleId::DeMorgan | RuleId::SimplifyLogic) {
            continue;
        }
        let Some(edit) = report.fix.as_ref().and_then(|f| f.edits().first()) else {
            continue;
        };
        let before = program.text(edit.range);
        let (line, column) = program.line_col(report.span.start);

        match check_equivalence(before, &edit.replacement, &domain) {
            Ok(None) => debug!(line, column, "rewrite verified"),
            Ok(Some(counterexample)) => {
                mismatches += 1;
                warn!(
                    rule = report.rule.as_str(),
                    line,
                    column,
                    before,
                    after = edit.replacement.as_str(),
                    "rewrite changes meaning: {}",
                    counterexample
                );
            }
            Err(error) => debug!(line, column, %error, "rewrite not verifiable"),
        }
    }
    mismatches
}

/// Execute a logic-lint check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let source = options.source.as_ref().ok_or(CliError::NoInput)?;
    let linter = Linter::new(options.config.clone());
    let program = parse(source)?;
    let reports = linter.lint(&program);

    if options.verify {
        let mismatches = verify_rewrites(&program, &reports);
        debug!(mismatches, "verification finished");
    }

    if options.fix {
        let outcome = linter.fix_source(source)?;
        debug!(
            passes = outcome.passes,
            applied = outcome.applied,
            "fixes applied"
        );
        return Ok(CheckResult::Fixed {
            source: outcome.output,
            applied: outcome.applied,
            remaining: outcome.remaining.len(),
        });
    }

    let rendered = match (options.format, options.pretty) {
        (OutputFormat::Text, _) => format_text(&options.path, &program, &reports),
        (OutputFormat::Json, false) => to_json(&program, &reports)?,
        (OutputFormat::Json, true) => to_json_pretty(&program, &reports)?,
    };
    Ok(CheckResult::Reports {
        rendered,
        count: reports.len(),
    })
}
