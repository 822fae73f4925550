// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Init command - creates a repository

use anyhow::{Context, Result};
use repolist::config::Config;
use repolist::Client;
use std::path::Path;

/// Run the init command
pub fn run(config: &Config, path: &Path, bare: bool) -> Result<()> {
    let repo = Client::from_config(config)
        .create_repository(path, bare)
        .with_context(|| format!("Failed to create repository at {}", path.display()))?;

    println!(
        "Initialized {} repository in {}",
        repo.layout().label(),
        repo.git_dir().display()
    );

    Ok(())
}
