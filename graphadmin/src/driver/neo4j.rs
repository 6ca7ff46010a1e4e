// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Bolt driver implementation on top of `neo4rs`
//!
//! `neo4rs` is async; the console is not. The connector owns a small tokio
//! runtime and every driver call blocks on it.

use neo4rs::{query, ConfigBuilder, Graph, Query, Row};
use std::sync::Arc;
use tokio::runtime::Runtime;

use super::{Connector, Driver, DriverSession};
use crate::config::ConnectionTarget;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::statement::{ParamValue, Parameters};

/// Connector producing Bolt drivers
pub struct BoltConnector {
    runtime: Arc<Runtime>,
}

impl BoltConnector {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("graphadmin-bolt")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime: Arc::new(runtime),
        })
    }
}

impl Connector for BoltConnector {
    fn connect(&self, target: &ConnectionTarget) -> Result<Box<dyn Driver>> {
        let config = ConfigBuilder::default()
            .uri(target.uri.as_str())
            .user(target.user.as_str())
            .password(target.password.expose())
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let graph = self
            .runtime
            .block_on(Graph::connect(config))
            .map_err(|e| Error::Connection(e.to_string()))?;

        log::info!("Bolt driver created for {} as '{}'", target.uri, target.user);

        Ok(Box::new(BoltDriver {
            graph: Some(graph),
            runtime: Arc::clone(&self.runtime),
        }))
    }
}

/// Driver over a `neo4rs` connection pool
pub struct BoltDriver {
    graph: Option<Graph>,
    runtime: Arc<Runtime>,
}

impl BoltDriver {
    fn graph(&self) -> Result<&Graph> {
        self.graph.as_ref().ok_or(Error::NotInitialized)
    }
}

impl Driver for BoltDriver {
    fn open_session(&self, database: Option<&str>) -> Result<Box<dyn DriverSession + '_>> {
        let graph = self.graph()?;
        log::debug!("Opening session on {}", database.unwrap_or("default database"));

        Ok(Box::new(BoltSession {
            graph,
            database: database.map(str::to_string),
            runtime: &self.runtime,
        }))
    }

    fn verify_connectivity(&self) -> Result<()> {
        let graph = self.graph()?;
        self.runtime
            .block_on(graph.run(query("RETURN 1")))
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the graph drains its pool
        if self.graph.take().is_some() {
            log::debug!("Bolt driver closed");
        }
        Ok(())
    }
}

/// A statement-scoped session borrowing the driver's pool
struct BoltSession<'a> {
    graph: &'a Graph,
    database: Option<String>,
    runtime: &'a Runtime,
}

impl DriverSession for BoltSession<'_> {
    fn run(&mut self, statement: &str, params: &Parameters) -> Result<Vec<Record>> {
        let query = bind(query(statement), params);
        let graph = self.graph;
        let database = self.database.as_deref();

        self.runtime
            .block_on(async move {
                let mut stream = match database {
                    Some(db) => graph.execute_on(db, query).await?,
                    None => graph.execute(query).await?,
                };

                let mut records = Vec::new();
                while let Some(row) = stream.next().await? {
                    records.push(to_record(&row));
                }
                Ok::<_, neo4rs::Error>(records)
            })
            .map_err(|e| Error::QueryExecution(e.to_string()))
    }

    fn close(self: Box<Self>) -> Result<()> {
        log::debug!(
            "Closing session on {}",
            self.database.as_deref().unwrap_or("default database")
        );
        Ok(())
    }
}

fn bind(mut query: Query, params: &Parameters) -> Query {
    for (name, value) in params.iter() {
        query = match value {
            ParamValue::Text(text) => query.param(name, text.clone()),
            ParamValue::TextList(items) => query.param(name, items.clone()),
            ParamValue::Integer(n) => query.param(name, *n),
        };
    }
    query
}

fn to_record(row: &Row) -> Record {
    match row.to::<serde_json::Map<String, serde_json::Value>>() {
        Ok(map) => Record::from(map),
        Err(e) => {
            log::debug!("Row is not representable as plain values ({}); keeping raw form", e);
            Record::raw(format!("{:?}", row))
        }
    }
}
