// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Administrative operations
//!
//! `Console` is the context every operation runs against: the session, the
//! configured target, the script library and the spawned server. Statement
//! failures are reported to the operator and turned into "no result"; only
//! failures that make the whole operation meaningless (no driver, unreadable
//! required script) are returned as errors.

use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::Write;
use std::time::Duration;

use crate::config::ConnectionTarget;
use crate::error::{Error, Result};
use crate::menu::LineSource;
use crate::output::{OutputFormat, ResultFormatter};
use crate::process::ServerHandle;
use crate::record::{elapsed_ms, QueryOutcome};
use crate::script::ScriptLibrary;
use crate::session::Session;
use crate::statement::{Parameters, Statement};
use crate::workspace::{
    self, WorkingDatabase, COUNT_NODES_SCRIPT, DISTRIBUTED_QUERY_SCRIPTS, DROP_INDEXES,
    REGION_PARAM, SHOW_DATABASES, WORKING_DATABASES,
};

const SEPARATOR: &str = "----------------------------------------------";

lazy_static! {
    static ref DATABASE_NAME: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9.\-]*$").expect("database name pattern");
}

/// Reject names that are not plain database identifiers
pub fn validate_database_name(name: &str) -> Result<&str> {
    if DATABASE_NAME.is_match(name) {
        Ok(name)
    } else {
        Err(Error::Config(format!(
            "Invalid database name '{}': use letters, digits, '.' and '-', starting with a letter",
            name
        )))
    }
}

/// Outcome of loading one working database from its setup script
#[derive(Debug, Clone, PartialEq)]
pub struct SetupReport {
    pub database: String,
    /// Run time of each statement that succeeded, in script order
    pub statement_times: Vec<Duration>,
    pub failed: usize,
}

impl SetupReport {
    fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            statement_times: Vec::new(),
            failed: 0,
        }
    }

    pub fn statements_issued(&self) -> usize {
        self.statement_times.len() + self.failed
    }

    /// Sum of per-statement run times
    pub fn total_elapsed(&self) -> Duration {
        self.statement_times.iter().sum()
    }
}

pub struct Console<W: Write> {
    session: Session,
    target: Option<ConnectionTarget>,
    scripts: ScriptLibrary,
    server: Option<Box<dyn ServerHandle>>,
    format: OutputFormat,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(session: Session, scripts: ScriptLibrary, out: W) -> Self {
        Self {
            session,
            target: None,
            scripts,
            server: None,
            format: OutputFormat::default(),
            out,
        }
    }

    /// Target used by the Connect operation
    pub fn with_target(mut self, target: ConnectionTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Server to terminate on exit
    pub fn with_server(mut self, server: Box<dyn ServerHandle>) -> Self {
        self.server = Some(server);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// 1: (re)connect to the configured target
    pub fn connect(&mut self) -> Result<()> {
        let target = self
            .target
            .clone()
            .ok_or_else(|| Error::Config("No connection target configured".to_string()))?;
        let uri = target.uri.clone();

        self.session.reconnect(target)?;
        writeln!(self.out, "{}", format!("Connected to {}", uri).green())?;
        Ok(())
    }

    /// 2: report whether the current connection is alive
    pub fn check_connection(&mut self) -> Result<bool> {
        let uri = self
            .session
            .connection()
            .target()
            .or(self.target.as_ref())
            .map(|target| target.uri.clone())
            .unwrap_or_else(|| "(not configured)".to_string());
        writeln!(self.out, "Target: {}", uri)?;

        let alive = self.session.is_connected();
        if alive {
            writeln!(self.out, "{}", "CONNECTED".green())?;
        } else {
            writeln!(self.out, "{}", "NOT CONNECTED".red())?;
        }
        Ok(alive)
    }

    /// 3: create (or replace) a database named by the operator
    pub fn create_database(&mut self, input: &mut dyn LineSource) -> Result<()> {
        let Some(name) = self.prompt_database_name(input, "Input a database name: ")? else {
            return Ok(());
        };

        let created = self
            .run_reported(&Statement::new(workspace::create_database(&name)))?
            .is_some();
        if created {
            writeln!(self.out, "{}", format!("Created database {}", name).green())?;
        }
        self.show_databases()
    }

    /// 4: create the working databases and load their setup scripts
    pub fn setup_environment(&mut self) -> Result<Vec<SetupReport>> {
        for db in WORKING_DATABASES.iter() {
            self.run_reported(&Statement::new(workspace::create_database(db.name)))?;
        }
        self.show_databases()?;

        let mut reports = Vec::with_capacity(WORKING_DATABASES.len());
        for db in WORKING_DATABASES.iter() {
            writeln!(self.out, "{}", SEPARATOR)?;
            writeln!(self.out, "{}", format!("Setup {}...", db.name).bold())?;

            if let Some(report) = self.load_working_database(db)? {
                writeln!(
                    self.out,
                    "{} statement(s), {} failed",
                    report.statements_issued(),
                    report.failed
                )?;
                self.print_elapsed(report.total_elapsed())?;
                reports.push(report);
            }

            let verification = Statement::new(db.verification_query).on(db.name);
            if let Some(outcome) = self.run_reported(&verification)? {
                self.print_outcome(&outcome)?;
                self.print_elapsed(outcome.elapsed)?;
            }
        }
        writeln!(self.out, "{}", SEPARATOR)?;

        Ok(reports)
    }

    /// Run every block of a working database's setup script against it
    ///
    /// Failed statements are reported and skipped. Returns `None` when the
    /// script itself cannot be read.
    pub fn load_working_database(&mut self, db: &WorkingDatabase) -> Result<Option<SetupReport>> {
        let blocks = match self.scripts.load_blocks(db.setup_script) {
            Ok(blocks) => blocks,
            Err(e @ Error::Script { .. }) => {
                log::warn!("Skipping setup of {}: {}", db.name, e);
                writeln!(self.out, "{}", format!("{}", e).red())?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let params = db
            .regions
            .map(|regions| Parameters::new().with(REGION_PARAM, regions))
            .unwrap_or_default();

        let mut report = SetupReport::new(db.name);
        for block in blocks {
            let statement = Statement::new(block)
                .on(db.name)
                .with_params(params.clone());
            match self.run_reported(&statement)? {
                Some(outcome) => report.statement_times.push(outcome.elapsed),
                None => report.failed += 1,
            }
        }

        log::info!(
            "Loaded {}: {} statement(s), {} failed",
            db.name,
            report.statements_issued(),
            report.failed
        );
        Ok(Some(report))
    }

    /// 5: list databases known to the server
    pub fn show_databases(&mut self) -> Result<()> {
        if let Some(outcome) = self.run_reported(&Statement::new(SHOW_DATABASES))? {
            writeln!(self.out, "{}", "Databases".bold())?;
            self.print_outcome(&outcome)?;
        }
        Ok(())
    }

    /// 6: drop a database named by the operator
    pub fn drop_database(&mut self, input: &mut dyn LineSource) -> Result<()> {
        let Some(name) = self.prompt_database_name(input, "Input a database name to drop: ")?
        else {
            return Ok(());
        };

        let dropped = self
            .run_reported(&Statement::new(workspace::drop_database(&name)))?
            .is_some();
        if dropped {
            writeln!(self.out, "{}", format!("Dropped database {}!", name).green())?;
        }
        self.show_databases()
    }

    /// 7: run the cross-database queries against the default database
    pub fn distributed_query(&mut self) -> Result<Vec<QueryOutcome>> {
        let mut outcomes = Vec::new();
        for script in DISTRIBUTED_QUERY_SCRIPTS {
            let query = match self.scripts.load(script) {
                Ok(query) => query,
                Err(e @ Error::Script { .. }) => {
                    writeln!(self.out, "{}", format!("{}", e).red())?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(outcome) = self.run_reported(&Statement::new(query.trim()))? {
                self.print_outcome(&outcome)?;
                self.print_elapsed(outcome.elapsed)?;
                outcomes.push(outcome);
            }
        }
        Ok(outcomes)
    }

    /// 8: drop every index and constraint on the default database
    pub fn drop_indexes(&mut self) -> Result<()> {
        if let Some(outcome) = self.run_reported(&Statement::new(DROP_INDEXES))? {
            self.print_outcome(&outcome)?;
        }
        Ok(())
    }

    /// 9: run the node count script against each working database
    pub fn count_nodes(&mut self) -> Result<()> {
        let query = self.scripts.load(COUNT_NODES_SCRIPT)?;
        let query = query.trim();

        for db in WORKING_DATABASES.iter() {
            writeln!(self.out, "{}", format!("{}:", db.name).bold())?;
            if let Some(outcome) = self.run_reported(&Statement::new(query).on(db.name))? {
                self.print_outcome(&outcome)?;
            }
        }
        Ok(())
    }

    /// 10: tear down the working databases when connected, stop the server
    pub fn shutdown(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "Thanks for using GraphAdmin. Goodbye!".green())?;

        if self.session.is_connected() {
            self.teardown_environment();
        } else {
            log::debug!("Not connected; skipping teardown");
        }

        if let Some(mut server) = self.server.take() {
            if let Err(e) = server.terminate() {
                log::warn!("Failed to terminate server: {}", e);
            }
        }

        if let Err(e) = self.session.close() {
            log::warn!("Failed to close connection: {}", e);
        }
        Ok(())
    }

    fn teardown_environment(&mut self) {
        for db in WORKING_DATABASES.iter() {
            let statement = Statement::new(workspace::drop_database(db.name));
            if let Err(e) = self.session.connection().execute(&statement) {
                log::warn!("Teardown of {} failed: {}", db.name, e);
            }
        }
    }

    /// Execute, reporting statement failures instead of returning them
    fn run_reported(&mut self, statement: &Statement) -> Result<Option<QueryOutcome>> {
        match self.session.connection().execute(statement) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) if e.is_statement_failure() => {
                log::warn!("{} failed: {}", statement, e);
                writeln!(self.out, "{}", format!("{}", e).red())?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn prompt_database_name(
        &mut self,
        input: &mut dyn LineSource,
        prompt: &str,
    ) -> Result<Option<String>> {
        let Some(line) = input.read_line(prompt)? else {
            writeln!(self.out, "{}", "No database name given".yellow())?;
            return Ok(None);
        };

        match validate_database_name(line.trim()) {
            Ok(name) => Ok(Some(name.to_string())),
            Err(e) => {
                writeln!(self.out, "{}", format!("{}", e).yellow())?;
                Ok(None)
            }
        }
    }

    fn print_outcome(&mut self, outcome: &QueryOutcome) -> Result<()> {
        writeln!(
            self.out,
            "{}",
            ResultFormatter::format(&outcome.records, self.format)
        )?;
        Ok(())
    }

    fn print_elapsed(&mut self, elapsed: Duration) -> Result<()> {
        writeln!(self.out, "Time elapsed in ms: {:.3}", elapsed_ms(elapsed))?;
        Ok(())
    }
}
