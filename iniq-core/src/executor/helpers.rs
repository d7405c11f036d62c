//! Operator application for the postfix evaluator.
//!
//! - apply_operator: combine two values with a binary operator
//! - repeat_text: text repetition with length guards
//! - concat_text: text concatenation with length guards

use crate::ast::Operator;
use crate::error::{IniqError, IniqResult};
use crate::value::Value;

use super::EvalLimits;

/// Apply a binary operator. `left` is the operand that was pushed first.
pub fn apply_operator(
    left: Value,
    op: Operator,
    right: Value,
    limits: &EvalLimits,
) -> IniqResult<Value> {
    let types = (left.type_name(), right.type_name());

    match (left, right) {
        (Value::Number(a), Value::Number(b)) => evaluate_numeric(a, op, b).map(Value::Number),
        (Value::Text(a), Value::Text(b)) => match op {
            Operator::Add => concat_text(a, &b, limits).map(Value::Text),
            _ => Err(IniqError::Type(
                "illegal operation on two text values".to_string(),
            )),
        },
        (Value::Text(text), Value::Number(n)) | (Value::Number(n), Value::Text(text)) => {
            match op {
                Operator::Mul => repeat_text(&text, n, limits).map(Value::Text),
                _ => Err(IniqError::Type(format!(
                    "illegal operation '{}' between {} and {}",
                    op, types.0, types.1
                ))),
            }
        }
    }
}

/// Float arithmetic. Division by zero yields inf or NaN.
#[inline]
fn evaluate_numeric(a: f64, op: Operator, b: f64) -> IniqResult<f64> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Sub => Ok(a - b),
        Operator::Mul => Ok(a * b),
        Operator::Div => Ok(a / b),
        Operator::Mod => Ok(a % b),
        Operator::Pow => Ok(a.powf(b)),
        Operator::LeftParen | Operator::RightParen => Err(IniqError::Internal(format!(
            "parenthesis '{}' in postfix program",
            op
        ))),
    }
}

fn too_long() -> IniqError {
    IniqError::Overflow("resulting text too long".to_string())
}

fn reserve(buf: &mut String, additional: usize) -> IniqResult<()> {
    buf.try_reserve_exact(additional).map_err(|e| {
        IniqError::Resource(format!("cannot allocate {} bytes of text: {}", additional, e))
    })
}

/// Append `right` to `left`, refusing results longer than the limit.
pub fn concat_text(mut left: String, right: &str, limits: &EvalLimits) -> IniqResult<String> {
    left.len()
        .checked_add(right.len())
        .filter(|&len| len <= limits.max_text_len)
        .ok_or_else(too_long)?;

    reserve(&mut left, right.len())?;
    left.push_str(right);
    Ok(left)
}

/// Repeat `text` `trunc(factor)` times.
///
/// Both the factor and the final length are checked before anything is
/// allocated.
pub fn repeat_text(text: &str, factor: f64, limits: &EvalLimits) -> IniqResult<String> {
    let factor = factor.trunc();
    if factor.is_nan() || factor < 0.0 || factor >= usize::MAX as f64 {
        return Err(IniqError::Overflow("factor too large".to_string()));
    }

    let count = factor as usize;
    if count == 0 || text.is_empty() {
        return Ok(String::new());
    }

    let len = text
        .len()
        .checked_mul(count)
        .filter(|&len| len <= limits.max_text_len)
        .ok_or_else(too_long)?;

    let mut out = String::new();
    reserve(&mut out, len)?;
    for _ in 0..count {
        out.push_str(text);
    }
    Ok(out)
}
