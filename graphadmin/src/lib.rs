// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! GraphAdmin - operator console core for Neo4j graph databases
//!
//! The crate launches a local database server, keeps one Bolt connection
//! open at a time, and exposes the console's administrative operations
//! (create / drop databases, load setup scripts, distributed queries, node
//! counts) behind a numbered menu.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  menu::Dispatcher (selection loop)      │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  operations::Console                    │
//! │  - Session (current Connection)         │
//! │  - ScriptLibrary (statement blocks)     │
//! │  - ServerHandle (spawned server)        │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  driver::{Connector, Driver, Session}   │
//! │  - BoltConnector (neo4rs)               │
//! └─────────────────────────────────────────┘
//! ```

pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod menu;
pub mod operations;
pub mod output;
pub mod process;
pub mod record;
pub mod script;
pub mod session;
pub mod statement;
pub mod workspace;

pub use config::{ConnectionTarget, ConsoleConfig, Secret};
pub use connection::Connection;
pub use driver::{BoltConnector, Connector, Driver, DriverSession};
pub use error::{Error, Result};
pub use menu::{DispatchState, Dispatcher, LineSource, MenuOption, ReaderInput};
pub use operations::{Console, SetupReport};
pub use output::{OutputFormat, ResultFormatter};
pub use process::{ServerHandle, ServerProcess};
pub use record::{QueryOutcome, Record};
pub use script::ScriptLibrary;
pub use session::Session;
pub use statement::{ParamValue, Parameters, Statement};
