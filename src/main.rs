use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser as ClapParser, Subcommand};
use logic_lint::{
    cli::{self, CheckOptions, CheckResult, CliError, OutputFormat},
    config::LintConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "logic-lint")]
#[command(about = "logic-lint - Simplify boolean logic and redundant control flow in JavaScript")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a JavaScript file
    Check {
        /// File to lint (reads from stdin if not provided)
        path: Option<PathBuf>,

        /// Print the fixed source instead of the reports
        #[arg(long)]
        fix: bool,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Re-check logical rewrites with the reference evaluator
        #[arg(long)]
        verify: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            path,
            fix,
            format,
            config,
            verify,
            pretty,
        } => run_check(path, fix, format, config, verify, pretty),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the input came out clean.
fn run_check(
    path: Option<PathBuf>,
    fix: bool,
    format: OutputFormat,
    config: Option<PathBuf>,
    verify: bool,
    pretty: bool,
) -> Result<bool, CliError> {
    let (source, display) = match path {
        Some(path) => (
            Some(fs::read_to_string(&path)?),
            path.display().to_string(),
        ),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            (Some(buffer), "<stdin>".to_string())
        }
        None => (None, "<stdin>".to_string()),
    };

    let config = match config {
        Some(path) => LintConfig::load(&path)?,
        None => LintConfig::default(),
    };

    let options = CheckOptions {
        source,
        path: display,
        fix,
        format,
        pretty,
        verify,
        config,
    };

    let result = cli::execute_check(&options)?;
    match &result {
        CheckResult::Reports { rendered, .. } => print!("{}", rendered),
        CheckResult::Fixed { source, .. } => print!("{}", source),
    }
    Ok(result.is_clean())
}
