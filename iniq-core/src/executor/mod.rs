//! Executor module for iniq queries.
//!
//! [`Evaluator`] runs one postfix program over resolved operand values;
//! [`BatchExecutor`] compiles a list of queries, resolves all of them in a
//! single scan of an INI source and evaluates them in order.

mod batch;
mod helpers;

pub use batch::BatchExecutor;
pub use helpers::*;

use crate::ast::Token;
use crate::error::{IniqError, IniqResult};
use crate::value::Value;

/// Default upper bound on text produced during evaluation (64 MiB)
pub const DEFAULT_MAX_TEXT_LEN: usize = 64 * 1024 * 1024;

/// Configuration for evaluation limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalLimits {
    /// Longest text, in bytes, that concatenation or repetition may produce
    pub max_text_len: usize,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            max_text_len: DEFAULT_MAX_TEXT_LEN,
        }
    }
}

impl EvalLimits {
    /// Limits for untrusted input (1 MiB of text)
    pub fn strict() -> Self {
        Self {
            max_text_len: 1024 * 1024,
        }
    }
}

/// Stack machine for postfix programs.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    limits: EvalLimits,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: EvalLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &EvalLimits {
        &self.limits
    }

    /// Evaluate `program` with `slots[i]` bound to operand `i`.
    pub fn evaluate(&self, program: &[Token], slots: &[Value]) -> IniqResult<Value> {
        let mut stack: Vec<Value> = Vec::with_capacity(program.len());

        for token in program {
            match *token {
                Token::Operand(idx) => {
                    let value = slots.get(idx).ok_or_else(|| {
                        IniqError::Internal(format!(
                            "operand #{} out of range ({} values bound)",
                            idx,
                            slots.len()
                        ))
                    })?;
                    stack.push(value.clone());
                }
                Token::Constant(n) => stack.push(Value::Number(n)),
                Token::Operator(op) => {
                    let (right, left) = match (stack.pop(), stack.pop()) {
                        (Some(right), Some(left)) => (right, left),
                        _ => {
                            return Err(IniqError::Internal(format!(
                                "operator '{}' is missing an operand",
                                op
                            )))
                        }
                    };
                    stack.push(apply_operator(left, op, right, &self.limits)?);
                }
            }
        }

        let depth = stack.len();
        match (stack.pop(), stack.is_empty()) {
            (Some(result), true) => Ok(result),
            _ => Err(IniqError::Internal(format!(
                "program left {} values on the stack",
                depth
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;
    use crate::parser::parse;

    fn eval(query: &str, slots: &[Value]) -> IniqResult<Value> {
        let compiled = parse(query).unwrap();
        Evaluator::new().evaluate(&compiled.program, slots)
    }

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|n| Value::Number(*n)).collect()
    }

    fn eval_num(query: &str, values: &[f64]) -> f64 {
        eval(query, &numbers(values)).unwrap().as_f64().unwrap()
    }

    // ========================================================================
    // Precedence against direct evaluation
    // ========================================================================

    #[test]
    fn test_matches_direct_evaluation() {
        let (a, b, c, d) = (7.0_f64, 3.0_f64, 2.0_f64, 5.0_f64);
        let slots = [a, b, c, d];

        assert_eq!(eval_num("{a}+{b}*{c}", &slots), a + b * c);
        assert_eq!(eval_num("{a}*{b}+{c}", &slots), a * b + c);
        assert_eq!(eval_num("{a}-{b}-{c}", &slots), (a - b) - c);
        assert_eq!(eval_num("{a}-{b}+{c}", &slots), (a - b) + c);
        assert_eq!(eval_num("{a}/{b}*{c}", &slots), (a / b) * c);
        assert_eq!(eval_num("{a}%{b}*{c}", &slots), (a % b) * c);
        assert_eq!(eval_num("{a}^{b}^{c}", &slots), a.powf(b.powf(c)));
        assert_eq!(eval_num("{a}*{b}^{c}", &slots), a * b.powf(c));
        assert_eq!(
            eval_num("{a}-{b}*{c}^{d}/{a}+{d}%{b}", &slots),
            a - b * c.powf(d) / a + d % b
        );
    }

    #[test]
    fn test_parentheses_preserve_meaning() {
        let slots = numbers(&[4.0, 6.0, 2.5]);
        let grouped = eval("({a}+{b})*{c}", &slots).unwrap();
        let expanded = eval("{a}*{c}+{b}*{c}", &slots).unwrap();
        assert_eq!(grouped, expanded);
        assert_eq!(grouped, Value::Number(25.0));

        assert_eq!(eval_num("(({a}))-({b}-{c})", &[4.0, 6.0, 2.5]), 0.5);
    }

    #[test]
    fn test_constants_and_implicit_multiplication() {
        assert_eq!(eval_num("2{a}(3)", &[5.0]), 30.0);
        assert_eq!(eval_num("{a} * 1.5 + .5", &[4.0]), 6.5);
        assert_eq!(eval_num("({a}+1)({a}-1)", &[3.0]), 8.0);
    }

    #[test]
    fn test_repeated_operand_reads_same_slot() {
        assert_eq!(eval_num("{x}+{x}*{x}", &[3.0]), 12.0);
    }

    // ========================================================================
    // Text values
    // ========================================================================

    #[test]
    fn test_text_operations() {
        let slots = vec![Value::Text("ab".to_string()), Value::Number(3.0)];
        assert_eq!(
            eval("{s}*{n}", &slots).unwrap(),
            Value::Text("ababab".to_string())
        );
        assert_eq!(
            eval("{s}+{s}*2", &slots[..1]).unwrap(),
            Value::Text("ababab".to_string())
        );
        assert!(matches!(eval("{s}-{n}", &slots), Err(IniqError::Type(_))));
    }

    #[test]
    fn test_slot_is_not_consumed() {
        let slots = vec![Value::Text("hi".to_string())];
        let compiled = parse("{s}+{s}").unwrap();
        let evaluator = Evaluator::new();
        evaluator.evaluate(&compiled.program, &slots).unwrap();
        assert_eq!(
            evaluator.evaluate(&compiled.program, &slots).unwrap(),
            Value::Text("hihi".to_string())
        );
        assert_eq!(slots[0], Value::Text("hi".to_string()));
    }

    #[test]
    fn test_factor_from_nan_expression() {
        let slots = vec![Value::Text("a".to_string()), Value::Number(0.0)];
        match eval("{t}*({z}/{z})", &slots) {
            Err(IniqError::Overflow(msg)) => assert_eq!(msg, "factor too large"),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_limits() {
        let compiled = parse("{t}*{n}").unwrap();
        let slots = vec![Value::Text("ab".to_string()), Value::Number(1e6)];

        assert!(Evaluator::new().evaluate(&compiled.program, &slots).is_ok());
        assert!(matches!(
            Evaluator::with_limits(EvalLimits::strict()).evaluate(&compiled.program, &slots),
            Err(IniqError::Overflow(_))
        ));
    }

    // ========================================================================
    // Malformed programs
    // ========================================================================

    #[test]
    fn test_operator_without_operands() {
        let program = vec![Token::Operand(0), Token::Operator(Operator::Add)];
        assert!(matches!(
            Evaluator::new().evaluate(&program, &numbers(&[1.0])),
            Err(IniqError::Internal(_))
        ));
    }

    #[test]
    fn test_leftover_values() {
        let program = vec![Token::Operand(0), Token::Constant(2.0)];
        match Evaluator::new().evaluate(&program, &numbers(&[1.0])) {
            Err(IniqError::Internal(msg)) => {
                assert_eq!(msg, "program left 2 values on the stack")
            }
            other => panic!("expected internal error, got {:?}", other),
        }
        assert!(matches!(
            Evaluator::new().evaluate(&[], &[]),
            Err(IniqError::Internal(_))
        ));
    }

    #[test]
    fn test_operand_out_of_range() {
        let program = vec![Token::Operand(3)];
        assert!(matches!(
            Evaluator::new().evaluate(&program, &numbers(&[1.0])),
            Err(IniqError::Internal(_))
        ));
    }

    #[test]
    fn test_limit_presets() {
        assert_eq!(EvalLimits::default().max_text_len, 64 * 1024 * 1024);
        assert_eq!(EvalLimits::strict().max_text_len, 1024 * 1024);
        assert_eq!(Evaluator::new().limits(), &EvalLimits::default());
    }
}
