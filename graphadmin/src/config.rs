// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Console configuration
//!
//! Configuration is layered: built-in defaults, then an optional JSON file,
//! then whatever the binary applies from environment variables and flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_USER: &str = "neo4j";
pub const DEFAULT_SERVER_MODE: &str = "console";

/// Complete console configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    pub server: ServerConfig,
    pub connection: ConnectionConfig,
    pub scripts: ScriptConfig,
}

/// Local server process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Server launcher; when absent no process is spawned
    pub executable: Option<PathBuf>,
    /// Argument passed to the launcher
    pub mode: String,
    /// Bounded readiness wait after spawning; disabled when absent
    pub ready_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            executable: None,
            mode: DEFAULT_SERVER_MODE.to_string(),
            ready_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn ready_timeout(&self) -> Option<Duration> {
        self.ready_timeout_secs.map(Duration::from_secs)
    }
}

/// Bolt connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: Option<Secret>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            user: DEFAULT_USER.to_string(),
            password: None,
        }
    }
}

/// Location of the plain-text script resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    pub dir: PathBuf,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: ConsoleConfig = serde_json::from_str(&text)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Connection target, if credentials are complete
    pub fn target(&self) -> Option<ConnectionTarget> {
        self.connection.password.as_ref().map(|password| ConnectionTarget {
            uri: self.connection.uri.clone(),
            user: self.connection.user.clone(),
            password: password.clone(),
        })
    }
}

/// A password that never shows up in debug output or logs
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Server address plus credentials for one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub uri: String,
    pub user: String,
    pub password: Secret,
}

impl ConnectionTarget {
    pub fn new(uri: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: Secret::new(password),
        }
    }
}
