// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Connection handle
//!
//! A `Connection` wraps at most one driver. Without a driver the handle is
//! unusable and every call fails with `Error::NotInitialized`; it never
//! silently does nothing.

use std::time::Instant;

use crate::config::ConnectionTarget;
use crate::driver::{Connector, Driver};
use crate::error::{Error, Result};
use crate::record::QueryOutcome;
use crate::statement::Statement;

/// One driver bound to one server address and credentials
pub struct Connection {
    target: Option<ConnectionTarget>,
    driver: Option<Box<dyn Driver>>,
}

impl Connection {
    /// Placeholder handle used before the operator connects
    pub fn disconnected() -> Self {
        Self {
            target: None,
            driver: None,
        }
    }

    /// Build a driver for `target`, surfacing construction failures
    pub fn open(connector: &dyn Connector, target: ConnectionTarget) -> Result<Self> {
        let driver = connector.connect(&target)?;
        Ok(Self {
            target: Some(target),
            driver: Some(driver),
        })
    }

    /// Build a driver for `target`; on failure return an unusable handle
    pub fn open_or_unusable(connector: &dyn Connector, target: ConnectionTarget) -> Self {
        match connector.connect(&target) {
            Ok(driver) => Self {
                target: Some(target),
                driver: Some(driver),
            },
            Err(e) => {
                log::debug!("Driver construction for {} failed: {}", target.uri, e);
                Self {
                    target: Some(target),
                    driver: None,
                }
            }
        }
    }

    pub fn target(&self) -> Option<&ConnectionTarget> {
        self.target.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.driver.is_some()
    }

    /// Liveness check
    pub fn check_alive(&self) -> Result<()> {
        self.driver()?.verify_connectivity()
    }

    /// Run one statement in a fresh session and time the run call
    ///
    /// The session is closed whether or not the run succeeds. Only the run
    /// itself is timed, not session open/close.
    pub fn execute(&self, statement: &Statement) -> Result<QueryOutcome> {
        let driver = self.driver()?;
        log::debug!("Executing {}", statement);

        let mut session = driver.open_session(statement.database())?;

        let start = Instant::now();
        let result = session.run(statement.text(), statement.params());
        let elapsed = start.elapsed();

        if let Err(e) = session.close() {
            log::warn!("Failed to close session: {}", e);
        }

        let records = result?;
        log::debug!("{} record(s) in {:?}", records.len(), elapsed);
        Ok(QueryOutcome::new(records, elapsed))
    }

    /// Close the driver; calling this more than once is harmless
    pub fn close(&mut self) -> Result<()> {
        match self.driver.take() {
            Some(mut driver) => driver.close(),
            None => Ok(()),
        }
    }

    fn driver(&self) -> Result<&dyn Driver> {
        self.driver.as_deref().ok_or(Error::NotInitialized)
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Error closing connection: {}", e);
        }
    }
}
