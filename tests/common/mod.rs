//! Common test utilities for iniq tests
//!
//! Provides shared helper functions for:
//! - Writing INI sources and settings files to temp directories
//! - Running query batches against INI text
//! - Running the iniq binary

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use iniq_core::{BatchExecutor, IniqResult, Value};
use tempfile::TempDir;

/// A small configuration exercising sections, globals and value typing
pub const SAMPLE_INI: &str = "\
; global values
app = \"inventory\"
version = 3

[server]
host = localhost
port = 8080
workers = 4
timeout = 2.5

[db]
user = \"admin\"
pool = 16
replicas = .5

[paths]
root = /srv/data
";

pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Temp dir holding `app.ini` with [`SAMPLE_INI`]
pub fn create_sample_dir() -> (TempDir, PathBuf) {
    let dir = create_test_dir();
    let path = write_file(dir.path(), "app.ini", SAMPLE_INI);
    (dir, path)
}

pub fn run_queries(ini: &str, queries: &[&str]) -> IniqResult<Vec<Value>> {
    BatchExecutor::compile(queries)?.execute(ini.as_bytes())
}

pub fn run_single(ini: &str, query: &str) -> Value {
    run_queries(ini, &[query])
        .unwrap_or_else(|e| panic!("query {:?} failed: {}", query, e))
        .remove(0)
}

/// Run the iniq binary in `dir` with a clean environment, feeding `stdin`.
pub fn run_iniq(dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_iniq"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("INIQ_LOG")
        .env_remove("INIQ_FORMAT")
        .env_remove("INIQ_MAX_TEXT_LEN")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start iniq");

    {
        let mut child_stdin = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            child_stdin
                .write_all(input.as_bytes())
                .expect("Failed to write stdin");
        }
    }

    child.wait_with_output().expect("Failed to wait for iniq")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
