// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Menu model and command dispatcher
//!
//! The dispatcher reads one selection at a time:
//!
//! ```text
//! AwaitingInput --valid selector--> Dispatching(option) --> AwaitingInput
//!       |                                    |
//!       +--bad input: warn, stay             +--Exit--> Shutdown
//! ```

use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::operations::Console;

pub const PROMPT: &str = "Enter your choice: ";
pub const WRONG_INPUT: &str = "Wrong input. Please enter a number ...";
pub const INVALID_OPTION: &str = "Invalid option. Please enter a number between 1 and 10.";

/// The ten menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Connect,
    CheckConnection,
    CreateDatabase,
    SetupEnvironment,
    ShowDatabases,
    DropDatabase,
    DistributedQuery,
    DropIndexes,
    CountNodes,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 10] = [
        MenuOption::Connect,
        MenuOption::CheckConnection,
        MenuOption::CreateDatabase,
        MenuOption::SetupEnvironment,
        MenuOption::ShowDatabases,
        MenuOption::DropDatabase,
        MenuOption::DistributedQuery,
        MenuOption::DropIndexes,
        MenuOption::CountNodes,
        MenuOption::Exit,
    ];

    /// Number the operator types to pick this entry
    pub fn selector(self) -> i64 {
        Self::ALL
            .iter()
            .position(|option| *option == self)
            .map(|index| index as i64 + 1)
            .unwrap_or_default()
    }

    pub fn from_selector(selector: i64) -> Option<Self> {
        if (1..=Self::ALL.len() as i64).contains(&selector) {
            Some(Self::ALL[(selector - 1) as usize])
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Connect => "Connect to neo4j",
            MenuOption::CheckConnection => "Check connection",
            MenuOption::CreateDatabase => "Create database",
            MenuOption::SetupEnvironment => "Setup environment",
            MenuOption::ShowDatabases => "Show databases",
            MenuOption::DropDatabase => "Drop database",
            MenuOption::DistributedQuery => "Distributed query",
            MenuOption::DropIndexes => "Drop indexes",
            MenuOption::CountNodes => "Count nodes",
            MenuOption::Exit => "Exit",
        }
    }
}

impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.selector(), self.label())
    }
}

/// Result of parsing one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Option(MenuOption),
    NotANumber(String),
    /// An integer that names no option, kept as typed since it may not fit `i64`
    OutOfRange(String),
}

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^[+-]?[0-9]+$").expect("integer pattern");
}

pub fn parse_selection(input: &str) -> Selection {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(selector) => match MenuOption::from_selector(selector) {
            Some(option) => Selection::Option(option),
            None => Selection::OutOfRange(trimmed.to_string()),
        },
        Err(_) if INTEGER.is_match(trimmed) => Selection::OutOfRange(trimmed.to_string()),
        Err(_) => Selection::NotANumber(trimmed.to_string()),
    }
}

/// Source of operator input lines
pub trait LineSource {
    /// Read one line; `None` means input is exhausted
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Line source over any buffered reader, for piped input
///
/// Prompts go to `prompts` before each read; by default they are discarded.
pub struct ReaderInput<R, W = io::Sink> {
    reader: R,
    prompts: W,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            prompts: io::sink(),
        }
    }
}

impl<R: BufRead, W: Write> ReaderInput<R, W> {
    /// Echo prompts to `prompts`, e.g. stdout when input is piped
    pub fn with_prompts<P: Write>(self, prompts: P) -> ReaderInput<R, P> {
        ReaderInput {
            reader: self.reader,
            prompts,
        }
    }

    pub fn prompts(&self) -> &W {
        &self.prompts
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompts, "{}", prompt)?;
        self.prompts.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    AwaitingInput,
    Dispatching(MenuOption),
    Shutdown,
}

/// Reads selections and invokes the bound operations
pub struct Dispatcher {
    state: DispatchState,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            state: DispatchState::AwaitingInput,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Run until the operator exits or input runs out
    ///
    /// End of input is handled like selecting Exit so the server is never
    /// left running.
    pub fn run<W: Write>(
        &mut self,
        console: &mut Console<W>,
        input: &mut dyn LineSource,
    ) -> Result<()> {
        while self.state != DispatchState::Shutdown {
            print_menu(console.out())?;
            match input.read_line(PROMPT)? {
                Some(line) => {
                    self.handle_line(console, input, &line)?;
                }
                None => {
                    log::debug!("Input closed; shutting down");
                    self.dispatch(console, input, MenuOption::Exit)?;
                }
            }
        }
        Ok(())
    }

    /// Handle one line of operator input
    pub fn handle_line<W: Write>(
        &mut self,
        console: &mut Console<W>,
        input: &mut dyn LineSource,
        line: &str,
    ) -> Result<DispatchState> {
        match parse_selection(line) {
            Selection::Option(option) => self.dispatch(console, input, option),
            Selection::NotANumber(text) => {
                log::debug!("Ignoring non-numeric input '{}'", text);
                writeln!(console.out(), "{}", WRONG_INPUT.yellow())?;
                Ok(self.state)
            }
            Selection::OutOfRange(selector) => {
                log::debug!("Ignoring unknown selector {}", selector);
                writeln!(console.out(), "{}", INVALID_OPTION.yellow())?;
                Ok(self.state)
            }
        }
    }

    fn dispatch<W: Write>(
        &mut self,
        console: &mut Console<W>,
        input: &mut dyn LineSource,
        option: MenuOption,
    ) -> Result<DispatchState> {
        self.state = DispatchState::Dispatching(option);
        log::debug!("Dispatching '{}'", option.label());

        let result = match option {
            MenuOption::Connect => console.connect(),
            MenuOption::CheckConnection => console.check_connection().map(|_| ()),
            MenuOption::CreateDatabase => console.create_database(input),
            MenuOption::SetupEnvironment => console.setup_environment().map(|_| ()),
            MenuOption::ShowDatabases => console.show_databases(),
            MenuOption::DropDatabase => console.drop_database(input),
            MenuOption::DistributedQuery => console.distributed_query().map(|_| ()),
            MenuOption::DropIndexes => console.drop_indexes(),
            MenuOption::CountNodes => console.count_nodes(),
            MenuOption::Exit => console.shutdown(),
        };

        if let Err(e) = result {
            log::error!("'{}' failed: {}", option.label(), e);
            writeln!(console.out(), "{}", format!("Error: {}", e).red())?;
        }

        self.state = match option {
            MenuOption::Exit => DispatchState::Shutdown,
            _ => DispatchState::AwaitingInput,
        };
        Ok(self.state)
    }
}

pub fn print_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    for option in MenuOption::ALL {
        writeln!(out, "{}", option)?;
    }
    Ok(())
}
