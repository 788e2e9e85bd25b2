//! Report rendering for the command line.
//!
//! - **Text** via [`format_text()`]: one line per report,
//!   `path:line:col  rule/message-id  message`
//! - **JSON** via [`to_json()`] / [`to_json_pretty()`]: an array of report
//!   objects with 1-based positions and the edits of each fix
//!
//! # Examples
//!
//! ```
//! use logic_lint::{Linter, output::format_text, parser::parse};
//!
//! let program = parse("!(a === b);").unwrap();
//! let reports = Linter::default().lint(&program);
//! assert_eq!(
//!     format_text("input.js", &program, &reports),
//!     "input.js:1:1  de-morgan/negated-comparison  \
//!      Negated comparison can use the complementary operator\n"
//! );
//! ```

use serde::Serialize;

use crate::{
    ast::Program,
    fix::Fix,
    lint::{Report, RuleId},
};

#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub rule: RuleId,
    pub message_id: &'a str,
    pub message: &'a str,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub fix: Option<&'a Fix>,
    pub suggestions: &'a [Fix],
}

impl<'a> ReportView<'a> {
    pub fn new(program: &Program, report: &'a Report) -> Self {
        let (line, column) = program.line_col(report.span.start);
        let (end_line, end_column) = program.line_col(report.span.end);
        ReportView {
            rule: report.rule,
            message_id: report.message_id,
            message: &report.message,
            line,
            column,
            end_line,
            end_column,
            fix: report.fix.as_ref(),
            suggestions: &report.suggestions,
        }
    }
}

pub fn format_text(path: &str, program: &Program, reports: &[Report]) -> String {
    let mut out = String::new();
    for report in reports {
        let (line, column) = program.line_col(report.span.start);
        out.push_str(&format!(
            "{}:{}:{}  {}/{}  {}\n",
            path,
            line,
            column,
            report.rule.as_str(),
            report.message_id,
            report.message
        ));
    }
    out
}

fn views<'a>(program: &Program, reports: &'a [Report]) -> Vec<ReportView<'a>> {
    reports.iter().map(|r| ReportView::new(program, r)).collect()
}

pub fn to_json(program: &Program, reports: &[Report]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&views(program, reports))
}

pub fn to_json_pretty(program: &Program, reports: &[Report]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&views(program, reports))
}
