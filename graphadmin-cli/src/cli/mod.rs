// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for GraphAdmin
//!
//! Provides the command-line surface (flags, environment, config file)
//! and the interactive menu console.

pub mod commands;
pub mod console;

pub use commands::{Cli, Commands};
pub use console::{handle_console, handle_version};
