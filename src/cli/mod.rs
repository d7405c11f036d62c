//! Command-line front end
//!
//! Compiles the queries given on the command line, resolves them against one
//! INI source (a file or stdin) and prints one result per query.
//!
//! ## Exit Codes
//!
//! - `0` - every query evaluated
//! - `1` - malformed query or INI source, or out of memory
//! - `2` - I/O or settings error
//! - `3` - type, overflow or internal evaluation error
//! - `4` - unresolved operands

pub mod output;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use iniq_core::{BatchExecutor, EvalLimits, IniqError, IniqResult, Value};

use crate::config::{OutputFormat, Settings, SETTINGS_FILE_NAME};

pub const EXIT_INPUT: u8 = 1;
pub const EXIT_IO: u8 = 2;
pub const EXIT_EVAL: u8 = 3;
pub const EXIT_UNRESOLVED: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "iniq")]
#[command(about = "Evaluate expressions over values read from INI files", long_about = None)]
pub struct Args {
    /// Queries to evaluate (e.g. "{server.port} + 1")
    #[arg(required = true, value_name = "QUERY")]
    pub queries: Vec<String>,

    /// INI file to read; stdin when absent or "-"
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format (defaults to the settings file, else text)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Settings file
    #[arg(short, long, value_name = "PATH", default_value = SETTINGS_FILE_NAME)]
    pub config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where the INI text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            None => Source::Stdin,
            Some(p) if p.as_os_str() == "-" => Source::Stdin,
            Some(p) => Source::File(p.to_path_buf()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Compile `queries`, scan `source` once and evaluate every query.
pub fn run_batch<S: AsRef<str>>(
    queries: &[S],
    source: &Source,
    limits: EvalLimits,
) -> IniqResult<Vec<Value>> {
    let executor = BatchExecutor::compile_with_limits(queries, limits)?;
    tracing::info!(
        queries = queries.len(),
        source = %source.label(),
        "running batch"
    );

    let results = match source {
        Source::Stdin => executor.execute(std::io::stdin().lock())?,
        Source::File(path) => {
            let file = File::open(path).map_err(|e| {
                std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
            })?;
            executor.execute(BufReader::new(file))?
        }
    };

    tracing::info!(results = results.len(), "batch complete");
    Ok(results)
}

/// Map an engine error to the process exit code
pub fn exit_code(err: &IniqError) -> u8 {
    match err {
        IniqError::Syntax { .. } | IniqError::Format { .. } | IniqError::Resource(_) => {
            EXIT_INPUT
        }
        IniqError::Io(_) => EXIT_IO,
        IniqError::Type(_) | IniqError::Overflow(_) | IniqError::Internal(_) => EXIT_EVAL,
        IniqError::Unresolved(_) => EXIT_UNRESOLVED,
    }
}

/// Messages to report for an error, one per line. Unresolved operands are
/// listed individually.
pub fn error_lines(err: &IniqError) -> Vec<String> {
    match err {
        IniqError::Unresolved(missing) => missing
            .iter()
            .map(|operand| format!("Value not found: {}", operand))
            .collect(),
        other => vec![other.to_string()],
    }
}

/// Print error lines to stderr with the program prefix
pub fn report_error<S: AsRef<str>>(lines: &[S]) {
    for line in lines {
        eprintln!("{} {}", "iniq:".red().bold(), line.as_ref());
    }
}

/// Run the command with loaded settings and return the exit code.
pub fn run(args: &Args, settings: &Settings) -> ExitCode {
    let format = args.format.unwrap_or(settings.format);
    let source = Source::from_arg(args.file.as_deref());

    let results = match run_batch(args.queries.as_slice(), &source, settings.eval_limits()) {
        Ok(results) => results,
        Err(e) => {
            tracing::debug!(kind = e.kind(), "batch failed");
            report_error(&error_lines(&e));
            return ExitCode::from(exit_code(&e));
        }
    };

    let mut stdout = std::io::stdout().lock();
    match output::write_results(&mut stdout, &results, format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&[format!("cannot write results: {:#}", e)]);
            ExitCode::from(EXIT_IO)
        }
    }
}
