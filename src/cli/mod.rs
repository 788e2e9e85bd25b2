//! CLI support for logic-lint
//!
//! Provides programmatic access to the `check` command so other tools can
//! embed it without spawning a process.

mod check;

pub use check::{CheckOptions, CheckResult, OutputFormat, execute_check};

use std::io;

use thiserror::Error;

use crate::{config::ConfigError, parser::ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass a file path or pipe JavaScript to stdin.")]
    NoInput,
}
