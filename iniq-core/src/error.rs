//! Error types for iniq-core.
//!
//! Every failure is returned by value; mapping errors to exit codes is left
//! to the caller.

use thiserror::Error;

use crate::registry::OperandRef;

/// iniq error type
#[derive(Error, Debug)]
pub enum IniqError {
    #[error("Syntax error at column {column}: {message}")]
    Syntax { column: usize, message: String },

    #[error("Format error on line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("Value not found: {}", format_refs(.0))]
    Unresolved(Vec<OperandRef>),

    #[error("Type error: {0}")]
    Type(String),

    #[error("Overflow error: {0}")]
    Overflow(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for iniq operations
pub type IniqResult<T> = Result<T, IniqError>;

impl IniqError {
    pub(crate) fn syntax(column: usize, message: impl Into<String>) -> Self {
        IniqError::Syntax {
            column,
            message: message.into(),
        }
    }

    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        IniqError::Format {
            line,
            message: message.into(),
        }
    }

    /// Stable lowercase name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            IniqError::Syntax { .. } => "syntax",
            IniqError::Format { .. } => "format",
            IniqError::Unresolved(_) => "unresolved",
            IniqError::Type(_) => "type",
            IniqError::Overflow(_) => "overflow",
            IniqError::Resource(_) => "resource",
            IniqError::Io(_) => "io",
            IniqError::Internal(_) => "internal",
        }
    }
}

fn format_refs(refs: &[OperandRef]) -> String {
    refs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl serde::Serialize for IniqError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
