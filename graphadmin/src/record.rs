// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Query result records

use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// One result row: ordered `(column, value)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((column.into(), value.into()));
        self
    }

    /// Record for a row the driver could not decode into values
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new().with("row", Value::String(text.into()))
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Relies on serde_json's `preserve_order` so rows keep their RETURN order
impl From<serde_json::Map<String, Value>> for Record {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Record")?;
        for (name, value) in &self.fields {
            write!(f, " {}={}", name, render_value(value))?;
        }
        write!(f, ">")
    }
}

/// Render a value the way the console prints it inline
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

/// Rows returned by one statement plus the time the run call took
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub records: Vec<Record>,
    pub elapsed: Duration,
}

impl QueryOutcome {
    pub fn new(records: Vec<Record>, elapsed: Duration) -> Self {
        Self { records, elapsed }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Milliseconds with sub-millisecond precision, for timing lines
pub fn elapsed_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
