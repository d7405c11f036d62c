//! iniq - evaluate expressions over values read from INI files.
//!
//! The query engine lives in the `iniq-core` crate; this crate adds the
//! settings file and the command-line front end.

pub mod cli;
pub mod config;

pub use iniq_core::{BatchExecutor, EvalLimits, IniqError, IniqResult, Value};
