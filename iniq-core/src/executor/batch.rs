//! Batch executor: compile, scan once, evaluate in order.

use std::io::BufRead;

use crate::ast::CompiledQuery;
use crate::error::{IniqError, IniqResult};
use crate::parser;
use crate::scanner::Scanner;
use crate::value::Value;

use super::{EvalLimits, Evaluator};

/// Runs a fixed list of queries against INI sources.
///
/// A batch is all-or-nothing: the first compile, scan or evaluation error
/// aborts it and no results are returned.
pub struct BatchExecutor {
    queries: Vec<CompiledQuery>,
    evaluator: Evaluator,
}

impl BatchExecutor {
    /// Create an executor for already compiled queries.
    pub fn new(queries: Vec<CompiledQuery>) -> Self {
        Self::with_limits(queries, EvalLimits::default())
    }

    /// Create an executor with custom limits.
    pub fn with_limits(queries: Vec<CompiledQuery>, limits: EvalLimits) -> Self {
        Self {
            queries,
            evaluator: Evaluator::with_limits(limits),
        }
    }

    /// Compile query strings. The first syntax error aborts.
    pub fn compile<S: AsRef<str>>(sources: &[S]) -> IniqResult<Self> {
        Self::compile_with_limits(sources, EvalLimits::default())
    }

    pub fn compile_with_limits<S: AsRef<str>>(
        sources: &[S],
        limits: EvalLimits,
    ) -> IniqResult<Self> {
        let queries = sources
            .iter()
            .map(|source| parser::parse(source.as_ref()))
            .collect::<IniqResult<Vec<_>>>()?;

        tracing::debug!(queries = queries.len(), "compiled batch");
        Ok(Self::with_limits(queries, limits))
    }

    pub fn queries(&self) -> &[CompiledQuery] {
        &self.queries
    }

    pub fn limits(&self) -> &EvalLimits {
        self.evaluator.limits()
    }

    /// Resolve every query against `source` in one pass and evaluate them.
    ///
    /// # Returns
    /// One value per query, in query order
    pub fn execute<R: BufRead>(&self, source: R) -> IniqResult<Vec<Value>> {
        let resolved = Scanner::new(&self.queries).resolve(source)?;
        self.evaluate_resolved(&resolved)
    }

    /// Evaluate already resolved slot arrays, one per query.
    pub fn evaluate_resolved(&self, resolved: &[Vec<Value>]) -> IniqResult<Vec<Value>> {
        if resolved.len() != self.queries.len() {
            return Err(IniqError::Internal(format!(
                "{} value sets supplied for {} queries",
                resolved.len(),
                self.queries.len()
            )));
        }

        self.queries
            .iter()
            .zip(resolved)
            .map(|(query, slots)| {
                let result = self.evaluator.evaluate(&query.program, slots)?;
                tracing::debug!(query = %query.source, result = %result, "evaluated query");
                Ok(result)
            })
            .collect()
    }
}
