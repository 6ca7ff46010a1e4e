// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Session state: the single active connection
//!
//! The session is an ordinary value owned by the console. Operations borrow
//! the current connection at call time and never keep it across calls.

use crate::config::ConnectionTarget;
use crate::connection::Connection;
use crate::driver::Connector;
use crate::error::Result;

pub struct Session {
    connector: Box<dyn Connector>,
    connection: Connection,
}

impl Session {
    /// New session holding a disconnected placeholder
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector,
            connection: Connection::disconnected(),
        }
    }

    /// Close the current connection, then replace it with one for `target`
    ///
    /// On failure the session is left holding a disconnected handle.
    pub fn reconnect(&mut self, target: ConnectionTarget) -> Result<()> {
        let mut previous = std::mem::take(&mut self.connection);
        if let Err(e) = previous.close() {
            log::warn!("Error closing previous connection: {}", e);
        }

        log::info!("Connecting to {}", target.uri);
        self.connection = Connection::open(self.connector.as_ref(), target)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Silent liveness check
    pub fn is_connected(&self) -> bool {
        match self.connection.check_alive() {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Connection check failed: {}", e);
                false
            }
        }
    }

    pub fn close(&mut self) -> Result<()> {
        self.connection.close()
    }
}
