// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Statements and their parameters

use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value bound to a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    TextList(Vec<String>),
    Integer(i64),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<&[&str]> for ParamValue {
    fn from(values: &[&str]) -> Self {
        ParamValue::TextList(values.iter().map(|v| v.to_string()).collect())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::TextList(values)
    }
}

/// Named statement parameters, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

/// A query statement plus where and how to run it
///
/// The text is opaque to the console; it is handed to the driver untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    text: String,
    database: Option<String>,
    params: Parameters,
}

impl Statement {
    /// Statement against the server's default database
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            database: None,
            params: Parameters::new(),
        }
    }

    /// Bind the statement to a named database
    pub fn on(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_params(mut self, params: Parameters) -> Self {
        self.params = params;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first_line = self.text.lines().next().unwrap_or_default();
        match &self.database {
            Some(db) => write!(f, "[{}] {}", db, first_line),
            None => write!(f, "[default] {}", first_line),
        }
    }
}
