// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory engine used by the integration tests
//!
//! Understands just enough DDL (create / drop / show databases) to check the
//! console's bookkeeping, records every statement it is handed, and counts
//! open sessions.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;
use std::rc::Rc;

use graphadmin::{
    Connector, ConnectionTarget, Console, Driver, DriverSession, Error, Parameters, ReaderInput,
    Record, Result, ScriptLibrary, ServerHandle, Session,
};

/// One statement as seen by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub database: Option<String>,
    pub text: String,
    pub params: Parameters,
}

#[derive(Debug, Default)]
struct EngineState {
    databases: BTreeSet<String>,
    executed: Vec<Executed>,
    open_sessions: usize,
    sessions_opened: usize,
    drivers_closed: usize,
    refuse_connections: bool,
    failing: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Rc<RefCell<EngineState>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        let engine = Self::default();
        {
            let mut state = engine.state.borrow_mut();
            state.databases.insert("neo4j".to_string());
            state.databases.insert("system".to_string());
        }
        engine
    }

    pub fn connector(&self) -> Box<dyn Connector> {
        Box::new(FakeConnector {
            engine: self.clone(),
        })
    }

    /// Make every subsequent driver construction fail
    pub fn refuse_connections(&self) {
        self.state.borrow_mut().refuse_connections = true;
    }

    /// Fail any statement whose text contains `fragment`
    pub fn fail_statements_containing(&self, fragment: &str) {
        self.state.borrow_mut().failing.push(fragment.to_string());
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.state.borrow().executed.clone()
    }

    pub fn executed_on(&self, database: &str) -> Vec<Executed> {
        self.executed()
            .into_iter()
            .filter(|e| e.database.as_deref() == Some(database))
            .collect()
    }

    pub fn databases(&self) -> Vec<String> {
        self.state.borrow().databases.iter().cloned().collect()
    }

    pub fn add_database(&self, name: &str) {
        self.state.borrow_mut().databases.insert(name.to_string());
    }

    pub fn open_sessions(&self) -> usize {
        self.state.borrow().open_sessions
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.borrow().sessions_opened
    }

    pub fn drivers_closed(&self) -> usize {
        self.state.borrow().drivers_closed
    }

    fn run(&self, database: Option<&str>, text: &str, params: &Parameters) -> Result<Vec<Record>> {
        let mut state = self.state.borrow_mut();
        state.executed.push(Executed {
            database: database.map(str::to_string),
            text: text.to_string(),
            params: params.clone(),
        });

        if state.failing.iter().any(|fragment| text.contains(fragment.as_str())) {
            return Err(Error::QueryExecution(format!("rejected: {}", text)));
        }

        if let Some(name) = text.strip_prefix("CREATE OR REPLACE DATABASE ") {
            state.databases.insert(name.trim().to_string());
            return Ok(Vec::new());
        }
        if let Some(rest) = text.strip_prefix("DROP DATABASE ") {
            let name = rest.trim_end_matches(" IF EXISTS").trim();
            state.databases.remove(name);
            return Ok(Vec::new());
        }
        if text == "SHOW DATABASES" {
            return Ok(state
                .databases
                .iter()
                .map(|name| Record::new().with("name", name.as_str()).with("currentStatus", "online"))
                .collect());
        }

        Ok(vec![Record::new().with("statement", state.executed.len())])
    }
}

pub fn target() -> ConnectionTarget {
    ConnectionTarget::new("bolt://localhost:11007", "neo4j", "test-password")
}

struct FakeConnector {
    engine: FakeEngine,
}

impl Connector for FakeConnector {
    fn connect(&self, target: &ConnectionTarget) -> Result<Box<dyn Driver>> {
        if self.engine.state.borrow().refuse_connections {
            return Err(Error::Connection(format!("cannot reach {}", target.uri)));
        }
        Ok(Box::new(FakeDriver {
            engine: self.engine.clone(),
            closed: false,
        }))
    }
}

struct FakeDriver {
    engine: FakeEngine,
    closed: bool,
}

impl Driver for FakeDriver {
    fn open_session(&self, database: Option<&str>) -> Result<Box<dyn DriverSession + '_>> {
        let mut state = self.engine.state.borrow_mut();
        state.open_sessions += 1;
        state.sessions_opened += 1;
        Ok(Box::new(FakeSession {
            engine: self.engine.clone(),
            database: database.map(str::to_string),
        }))
    }

    fn verify_connectivity(&self) -> Result<()> {
        if self.engine.state.borrow().refuse_connections {
            Err(Error::Connection("server unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.engine.state.borrow_mut().drivers_closed += 1;
        }
        Ok(())
    }
}

struct FakeSession {
    engine: FakeEngine,
    database: Option<String>,
}

impl DriverSession for FakeSession {
    fn run(&mut self, statement: &str, params: &Parameters) -> Result<Vec<Record>> {
        self.engine.run(self.database.as_deref(), statement, params)
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.engine.state.borrow_mut().open_sessions -= 1;
        Ok(())
    }
}

/// Server stand-in counting terminate calls
#[derive(Clone, Default)]
pub struct FakeServer {
    terminations: Rc<Cell<usize>>,
}

impl FakeServer {
    pub fn terminations(&self) -> usize {
        self.terminations.get()
    }
}

impl ServerHandle for FakeServer {
    fn terminate(&mut self) -> Result<()> {
        self.terminations.set(self.terminations.get() + 1);
        Ok(())
    }
}

/// Scripted operator input
pub fn input(lines: &str) -> ReaderInput<Cursor<Vec<u8>>> {
    ReaderInput::new(Cursor::new(lines.as_bytes().to_vec()))
}

/// Console over the fake engine, writing into a buffer
pub fn console(engine: &FakeEngine, scripts: &Path) -> Console<Vec<u8>> {
    Console::new(
        Session::new(engine.connector()),
        ScriptLibrary::new(scripts),
        Vec::new(),
    )
    .with_target(target())
}

/// Console that has already run Connect
pub fn connected_console(engine: &FakeEngine, scripts: &Path) -> Console<Vec<u8>> {
    let mut console = console(engine, scripts);
    console.connect().expect("connect to fake engine");
    console
}

pub fn output_of(console: &mut Console<Vec<u8>>) -> String {
    String::from_utf8_lossy(console.out()).to_string()
}
