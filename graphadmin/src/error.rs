// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for GraphAdmin

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for GraphAdmin operations
#[derive(Error, Debug)]
pub enum Error {
    /// The driver could not be constructed for the configured target
    #[error("Connection error: {0}")]
    Connection(String),

    /// An operation was attempted while no driver is live
    #[error("Driver not initialized!")]
    NotInitialized,

    /// The server rejected or failed a statement
    #[error("Query failed: {0}")]
    QueryExecution(String),

    /// Server process launch, readiness or termination errors
    #[error("Process error: {0}")]
    Process(String),

    /// A script resource could not be read
    #[error("Script error: {}: {}", .path.display(), .source)]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration or operator input
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for failures that are local to a single statement.
    ///
    /// Loops over statement blocks report these and keep going; anything else
    /// aborts the surrounding operation.
    pub fn is_statement_failure(&self) -> bool {
        matches!(self, Error::QueryExecution(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
