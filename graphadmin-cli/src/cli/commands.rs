// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for GraphAdmin

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use graphadmin::{ConsoleConfig, OutputFormat, Secret};

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// GraphAdmin CLI - operator console for Neo4j
#[derive(Parser, Debug)]
#[command(name = "graphadmin")]
#[command(about = "GraphAdmin - A menu-driven operator console for Neo4j graph databases")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short = 'c', long = "config", env = "GRAPHADMIN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Server launcher to start in the background (e.g. /opt/neo4j/bin/neo4j)
    #[arg(long = "server", env = "GRAPHADMIN_SERVER", global = true)]
    pub server: Option<PathBuf>,

    /// Argument passed to the server launcher
    #[arg(long = "server-mode", global = true)]
    pub server_mode: Option<String>,

    /// Wait up to this many seconds for the server to accept connections
    #[arg(long = "ready-timeout", env = "GRAPHADMIN_READY_TIMEOUT", global = true)]
    pub ready_timeout: Option<u64>,

    /// Bolt URI of the server
    #[arg(long = "uri", env = "GRAPHADMIN_URI", global = true)]
    pub uri: Option<String>,

    /// Username for authentication
    #[arg(short = 'u', long = "user", env = "GRAPHADMIN_USER", global = true)]
    pub user: Option<String>,

    /// Password for authentication (if not provided, will be prompted)
    #[arg(
        short = 'p',
        long = "password",
        env = "GRAPHADMIN_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    pub password: Option<String>,

    /// Directory holding the setup and query scripts
    #[arg(long = "scripts", env = "GRAPHADMIN_SCRIPTS", global = true)]
    pub scripts: Option<PathBuf>,

    /// Output format for query results (table, json, csv)
    #[arg(short = 'f', long = "format", default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive console (default)
    Console,

    /// Show detailed version information
    Version,
}

impl Cli {
    /// Log level implied by the flags, if any was given
    pub fn level_filter(&self) -> Option<log::LevelFilter> {
        if self.verbose {
            Some(log::LevelFilter::Debug)
        } else {
            self.log_level.map(LogLevel::to_level_filter)
        }
    }

    /// Layer flags and environment over a loaded configuration
    pub fn apply_overrides(&self, config: &mut ConsoleConfig) {
        if let Some(server) = &self.server {
            config.server.executable = Some(server.clone());
        }
        if let Some(mode) = &self.server_mode {
            config.server.mode = mode.clone();
        }
        if let Some(timeout) = self.ready_timeout {
            config.server.ready_timeout_secs = Some(timeout);
        }
        if let Some(uri) = &self.uri {
            config.connection.uri = uri.clone();
        }
        if let Some(user) = &self.user {
            config.connection.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.connection.password = Some(Secret::new(password.clone()));
        }
        if let Some(scripts) = &self.scripts {
            config.scripts.dir = scripts.clone();
        }
    }
}
