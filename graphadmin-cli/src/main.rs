// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! GraphAdmin command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match cli.command {
        Some(Commands::Version) => {
            cli::handle_version();
            Ok(())
        }
        Some(Commands::Console) | None => cli::handle_console(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

/// Flags win over `RUST_LOG`; with neither, only warnings and errors show
fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = cli.level_filter() {
        builder.filter_level(level);
    }
    builder.format_timestamp_millis().init();
}
