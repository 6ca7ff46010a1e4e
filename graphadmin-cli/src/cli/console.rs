// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for GraphAdmin

use colored::Colorize;
use rustyline::history::DefaultHistory;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use super::commands::Cli;
use graphadmin::process::wait_until_reachable;
use graphadmin::{
    BoltConnector, Console, ConsoleConfig, Dispatcher, LineSource, ReaderInput, ScriptLibrary,
    Secret, ServerProcess, Session,
};

const HISTORY_PATH: &str = ".graphadmin/history.txt";

/// Handle the console command
///
/// Starts the server (when configured), then runs the menu loop until the
/// operator exits. The server is killed on every exit path.
pub fn handle_console(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ConsoleConfig::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // Prompt for the password if not provided
    if config.connection.password.is_none() {
        print!("Password for {}: ", config.connection.user);
        io::stdout().flush()?;
        config.connection.password = Some(Secret::new(rpassword::read_password()?));
    }
    let target = config
        .target()
        .ok_or("Missing credentials for the Bolt connection")?;

    println!("{}", "GraphAdmin".bold().green());
    let server = start_server(&config)?;

    let session = Session::new(Box::new(BoltConnector::new()?));
    let mut console = Console::new(
        session,
        ScriptLibrary::new(&config.scripts.dir),
        io::stdout(),
    )
    .with_target(target)
    .with_format(cli.format);
    if let Some(server) = server {
        console = console.with_server(Box::new(server));
    }

    println!("Scripts directory: {}", config.scripts.dir.display());
    println!(
        "{}",
        format!("Target: {} as {}", config.connection.uri, config.connection.user).cyan()
    );

    let mut dispatcher = Dispatcher::new();
    if io::stdin().is_terminal() {
        let mut input = EditorInput::new(PathBuf::from(HISTORY_PATH))?;
        let result = dispatcher.run(&mut console, &mut input);
        input.save_history();
        result?;
    } else {
        let stdin = io::stdin();
        let mut input = ReaderInput::new(stdin.lock()).with_prompts(io::stdout());
        dispatcher.run(&mut console, &mut input)?;
    }

    Ok(())
}

/// Handle the version command
pub fn handle_version() {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bold().green(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!("Bolt client: neo4rs");
}

/// Launch the configured server, optionally waiting until it is reachable
fn start_server(
    config: &ConsoleConfig,
) -> Result<Option<ServerProcess>, Box<dyn std::error::Error>> {
    let Some(executable) = &config.server.executable else {
        log::warn!(
            "No server executable configured; assuming {} is managed externally",
            config.connection.uri
        );
        return Ok(None);
    };

    println!(
        "  → Starting {} {}...",
        executable.display(),
        config.server.mode
    );
    let server = ServerProcess::spawn(executable, &config.server.mode)?;

    match config.server.ready_timeout() {
        Some(timeout) => {
            println!("  → Waiting for {} to accept connections...", config.connection.uri);
            wait_until_reachable(&config.connection.uri, timeout)?;
            println!("    Server is up");
        }
        None => {
            println!(
                "{}",
                "  Server started in the background; it may need a moment before Connect succeeds"
                    .yellow()
            );
        }
    }

    Ok(Some(server))
}

/// Interactive line source backed by rustyline
struct EditorInput {
    editor: Editor<(), DefaultHistory>,
    history_path: PathBuf,
}

impl EditorInput {
    fn new(history_path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();

        let mut editor = Editor::<(), _>::with_config(config)?;

        if let Some(parent) = Path::new(&history_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    fn save_history(&mut self) {
        if let Err(e) = self.editor.save_history(&self.history_path) {
            log::debug!("Could not save history: {}", e);
        }
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> graphadmin::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl-C abandons the current line
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e.into()),
            Err(err) => Err(graphadmin::Error::Io(io::Error::new(
                io::ErrorKind::Other,
                err.to_string(),
            ))),
        }
    }
}
