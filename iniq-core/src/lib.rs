//! iniq Core - query expressions over INI configuration values.
//!
//! A query combines `{section.key}` references, numeric constants and the
//! operators `+ - * / % ^` with parentheses. Queries are compiled once into a
//! postfix program, resolved against an INI source in a single pass and
//! evaluated over `Number` and `Text` values.
//!
//! # Main Components
//!
//! - **Parser**: Validates a query and compiles it to postfix form
//! - **Scanner**: Resolves operand references from an INI source
//! - **Executor**: Evaluates compiled programs, alone or as a batch
//!
//! # Example
//!
//! ```rust
//! use iniq_core::{BatchExecutor, Value};
//!
//! let config = "[server]\nport = 8080\nhost = \"example\"\n";
//!
//! let executor = BatchExecutor::compile(&["{server.port} + 1", "{server.host} * 2"]).unwrap();
//! let results = executor.execute(config.as_bytes()).unwrap();
//!
//! assert_eq!(results[0], Value::Number(8081.0));
//! assert_eq!(results[1].to_string(), "exampleexample");
//! ```

pub mod ast;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod value;

// Re-export main types for convenience
pub use ast::{Associativity, CompiledQuery, Operator, Token};
pub use error::{IniqError, IniqResult};
pub use executor::{BatchExecutor, EvalLimits, Evaluator};
pub use parser::{parse, Parser};
pub use registry::{OperandRef, OperandRegistry};
pub use scanner::{resolve, Scanner};
pub use value::{format_number, Value};
