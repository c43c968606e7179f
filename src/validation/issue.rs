// src/validation/issue.rs

//! Issues reported by validation rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Name of the rule that reported it
    pub rule: &'static str,

    pub message: String,

    /// Structured details (ids, expected and actual values)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, Value>,

    /// 1-based row of the submitted draft, if the issue stems from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl Issue {
    pub fn new(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            context: BTreeMap::new(),
            row: None,
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn at_row(mut self, row: Option<usize>) -> Self {
        self.row = row;
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {}: [{}] {}", row, self.rule, self.message),
            None => write!(f, "[{}] {}", self.rule, self.message),
        }
    }
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub issues: Vec<Issue>,
}

impl ValidationResult {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues grouped by originating row.
    ///
    /// Issues not tied to a row (counts, balance, lane consistency) are keyed
    /// by `None` and sort first.
    pub fn issues_by_row(&self) -> BTreeMap<Option<usize>, Vec<&Issue>> {
        let mut grouped: BTreeMap<Option<usize>, Vec<&Issue>> = BTreeMap::new();
        for issue in &self.issues {
            grouped.entry(issue.row).or_default().push(issue);
        }
        grouped
    }
}
