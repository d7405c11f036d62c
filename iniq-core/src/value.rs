//! Typed values read from INI files and produced by evaluation.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]*\.?[0-9]+$").expect("number pattern is a valid regex")
});

/// A resolved value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

/// Storage cell for one operand during a scan; `None` until resolved
pub type ValueSlot = Option<Value>;

impl Value {
    /// Type a raw INI value.
    ///
    /// A value wrapped in a pair of double quotes is text with the quotes
    /// stripped; a plain decimal like `42`, `3.14` or `.5` is a number;
    /// anything else is kept as raw text.
    pub fn from_ini_str(raw: &str) -> Value {
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return Value::Text(raw[1..raw.len() - 1].to_string());
        }

        if NUMBER_RE.is_match(raw) {
            if let Ok(n) = raw.parse::<f64>() {
                return Value::Number(n);
            }
        }

        Value::Text(raw.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(n) => serializer.collect_str(&format_number(*n)),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Render a number in the shortest form that parses back to the same value.
///
/// Like `%g`, very large and very small magnitudes switch to exponent
/// notation with a signed, at least two-digit exponent.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let abs = n.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    format!("{}", n)
}
