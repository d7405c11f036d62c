//! Operand references and the per-query operand registry.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// A single INI location of a value: a section name plus a key.
///
/// The empty namespace denotes keys outside of any section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OperandRef {
    pub namespace: String,
    pub name: String,
}

impl OperandRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// True for keys outside of any section.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }
}

impl fmt::Display for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// An ordered set of operand references.
///
/// Every distinct (namespace, name) pair is stored at most once and keeps the
/// index it was given on first insertion.
#[derive(Debug, Clone, Default)]
pub struct OperandRegistry {
    operands: Vec<OperandRef>,
    index: HashMap<OperandRef, usize>,
}

impl OperandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pair and return its index. Adding an existing pair returns
    /// the index it already has.
    pub fn add(&mut self, namespace: &str, name: &str) -> usize {
        let operand = OperandRef::new(namespace, name);
        if let Some(&idx) = self.index.get(&operand) {
            return idx;
        }

        let idx = self.operands.len();
        self.operands.push(operand.clone());
        self.index.insert(operand, idx);
        idx
    }

    pub fn get(&self, index: usize) -> Option<&OperandRef> {
        self.operands.get(index)
    }

    pub fn len(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperandRef> {
        self.operands.iter()
    }
}

impl<'a> IntoIterator for &'a OperandRegistry {
    type Item = &'a OperandRef;
    type IntoIter = std::slice::Iter<'a, OperandRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
