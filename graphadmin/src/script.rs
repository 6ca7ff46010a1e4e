// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Plain-text script resources
//!
//! A script is a sequence of statement blocks separated by blank lines. Each
//! block is one logical statement and may span several lines.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory of named script resources
#[derive(Debug, Clone)]
pub struct ScriptLibrary {
    dir: PathBuf,
}

impl ScriptLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read a script resource verbatim
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.path_of(name);
        log::debug!("Loading script {}", path.display());
        std::fs::read_to_string(&path).map_err(|source| Error::Script { path, source })
    }

    /// Read a script resource and split it into statement blocks
    pub fn load_blocks(&self, name: &str) -> Result<Vec<String>> {
        let text = self.load(name)?;
        Ok(split_blocks(&text))
    }
}

/// Split script text into statement blocks
///
/// Any whitespace-only line ends the current block. Blocks are trimmed and
/// empty blocks are dropped, so leading, trailing or repeated blank lines
/// never produce empty statements.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            push_block(&mut blocks, &mut current);
        } else {
            current.push(line.trim_end());
        }
    }
    push_block(&mut blocks, &mut current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, current: &mut Vec<&str>) {
    if !current.is_empty() {
        blocks.push(current.join("\n").trim().to_string());
        current.clear();
    }
}
