// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Client driver seam
//!
//! The console only needs three things from a database client:
//! - build a driver for a target (`Connector`)
//! - open a session scoped to one database (`Driver`)
//! - run a statement inside that session (`DriverSession`)
//!
//! `neo4j::BoltConnector` is the production implementation. Tests plug in an
//! in-memory engine through the same traits.

pub mod neo4j;

use crate::config::ConnectionTarget;
use crate::error::Result;
use crate::record::Record;
use crate::statement::Parameters;

pub use neo4j::BoltConnector;

/// Builds drivers for connection targets
pub trait Connector {
    fn connect(&self, target: &ConnectionTarget) -> Result<Box<dyn Driver>>;
}

/// A live client bound to one server address and credentials
pub trait Driver {
    /// Open a session against `database`, or the server default when `None`
    fn open_session(&self, database: Option<&str>) -> Result<Box<dyn DriverSession + '_>>;

    /// Round-trip to the server to prove the connection is usable
    fn verify_connectivity(&self) -> Result<()>;

    /// Release client resources
    fn close(&mut self) -> Result<()>;
}

/// Execution context for a single statement run
pub trait DriverSession {
    fn run(&mut self, statement: &str, params: &Parameters) -> Result<Vec<Record>>;

    fn close(self: Box<Self>) -> Result<()>;
}
