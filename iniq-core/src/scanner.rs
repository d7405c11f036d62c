//! Single-pass INI scanner.
//!
//! Reads a configuration source line by line exactly once and fills the value
//! slots of every compiled query whose operands match `(section, key)` pairs
//! in the source. The first definition of a pair wins.

use std::collections::HashMap;
use std::io::BufRead;

use crate::ast::CompiledQuery;
use crate::error::{IniqError, IniqResult};
use crate::registry::OperandRef;
use crate::value::{Value, ValueSlot};

/// One meaningful line of an INI file
#[derive(Debug, Clone, PartialEq)]
pub enum IniLine<'a> {
    /// `[name]`
    Section(&'a str),
    /// `key = value`
    Assignment { key: &'a str, value: Value },
    /// Blank line or `;` comment
    Blank,
}

fn is_section_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Classify a single line. Errors carry a description without the line
/// number, which the scanner adds.
pub fn classify_line(line: &str) -> Result<IniLine<'_>, String> {
    let trimmed = line.trim();

    if trimmed.is_empty() || trimmed.starts_with(';') {
        return Ok(IniLine::Blank);
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        let end = rest
            .find(']')
            .ok_or_else(|| "no closing bracket after section name".to_string())?;
        let name = &rest[..end];

        if let Some(ch) = name.chars().find(|c| !is_section_char(*c)) {
            return Err(format!("illegal character '{}' in section name", ch));
        }
        if name.is_empty() {
            return Err("empty section name".to_string());
        }

        let trailing = rest[end + 1..].trim_start();
        if !trailing.is_empty() && !trailing.starts_with(';') {
            return Err(format!("unexpected text after section name: '{}'", trailing));
        }

        return Ok(IniLine::Section(name));
    }

    let first = trimmed.chars().next().unwrap_or(' ');
    if !(first.is_ascii_alphanumeric() || first == '_') {
        return Err(format!("unexpected character '{}' at start of line", first));
    }

    let key_end = trimmed
        .find(|c: char| c.is_whitespace() || c == '=')
        .ok_or_else(|| format!("no value after key '{}'", trimmed))?;
    let key = &trimmed[..key_end];

    let rest = trimmed[key_end..]
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| format!("expected '=' after key '{}'", key))?;

    let raw = rest.trim();
    if raw.is_empty() {
        return Err(format!("no value after key '{}'", key));
    }

    Ok(IniLine::Assignment {
        key,
        value: Value::from_ini_str(raw),
    })
}

/// Resolves the operands of a batch of compiled queries against INI sources.
pub struct Scanner<'q> {
    queries: &'q [CompiledQuery],
    /// section -> key -> (query index, operand index)
    targets: HashMap<&'q str, HashMap<&'q str, Vec<(usize, usize)>>>,
}

impl<'q> Scanner<'q> {
    pub fn new(queries: &'q [CompiledQuery]) -> Self {
        let mut targets: HashMap<&'q str, HashMap<&'q str, Vec<(usize, usize)>>> =
            HashMap::new();

        for (q, query) in queries.iter().enumerate() {
            for (i, operand) in query.operands.iter().enumerate() {
                targets
                    .entry(operand.namespace.as_str())
                    .or_default()
                    .entry(operand.name.as_str())
                    .or_default()
                    .push((q, i));
            }
        }

        Self { queries, targets }
    }

    /// Run one pass over `source`, returning one resolved value array per
    /// query, indexed like that query's operand registry.
    pub fn resolve<R: BufRead>(&self, mut source: R) -> IniqResult<Vec<Vec<Value>>> {
        let mut slots: Vec<Vec<ValueSlot>> = self
            .queries
            .iter()
            .map(|q| vec![None; q.operands.len()])
            .collect();

        let mut section = String::new();
        let mut buf: Vec<u8> = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if source.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let text = std::str::from_utf8(&buf)
                .map_err(|_| IniqError::format(line_no, "line is not valid UTF-8"))?;
            let line = classify_line(text).map_err(|msg| IniqError::format(line_no, msg))?;
            tracing::trace!(line = line_no, kind = ?line, "classified line");

            match line {
                IniLine::Blank => {}
                IniLine::Section(name) => {
                    tracing::debug!(line = line_no, section = name, "entering section");
                    section.clear();
                    section.push_str(name);
                }
                IniLine::Assignment { key, value } => {
                    self.fill(&mut slots, &section, key, value, line_no);
                }
            }
        }

        let missing = self.unresolved(&slots);
        if !missing.is_empty() {
            return Err(IniqError::Unresolved(missing));
        }

        Ok(slots
            .into_iter()
            .map(|query_slots| query_slots.into_iter().flatten().collect())
            .collect())
    }

    fn fill(
        &self,
        slots: &mut [Vec<ValueSlot>],
        section: &str,
        key: &str,
        value: Value,
        line_no: usize,
    ) {
        let Some(targets) = self.targets.get(section).and_then(|keys| keys.get(key)) else {
            return;
        };

        let mut redefined = false;
        for &(q, i) in targets {
            let slot = &mut slots[q][i];
            if slot.is_none() {
                tracing::debug!(
                    line = line_no,
                    section,
                    key,
                    value = %value,
                    query = q,
                    "resolved operand"
                );
                *slot = Some(value.clone());
            } else {
                redefined = true;
            }
        }

        if redefined {
            tracing::warn!(
                line = line_no,
                section,
                key,
                "ignoring redefinition, first value wins"
            );
        }
    }

    /// Every unresolved operand, each listed once, in query then index order.
    fn unresolved(&self, slots: &[Vec<ValueSlot>]) -> Vec<OperandRef> {
        let mut missing: Vec<OperandRef> = Vec::new();

        for (query, query_slots) in self.queries.iter().zip(slots) {
            for (operand, slot) in query.operands.iter().zip(query_slots) {
                if slot.is_none() && !missing.contains(operand) {
                    missing.push(operand.clone());
                }
            }
        }

        missing
    }
}

/// Resolve all operands of `queries` against one INI source.
pub fn resolve<R: BufRead>(source: R, queries: &[CompiledQuery]) -> IniqResult<Vec<Vec<Value>>> {
    Scanner::new(queries).resolve(source)
}
