// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

use anyhow::{bail, Result};
use repolist::config::Config;
use std::path::PathBuf;

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod resolve;
pub mod show;

/// Output switches shared by every command
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Print JSON instead of text
    pub json: bool,
    /// Colorize text output
    pub color: bool,
}

/// Configured scan roots, or an error telling the user how to set them
fn roots(config: &Config) -> Result<&[PathBuf]> {
    if config.repositories.is_empty() {
        bail!("No repository roots configured; pass --root or set `repositories` in the config file");
    }
    Ok(&config.repositories)
}
