// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! List command - discovers git repositories below the configured roots

use super::Output;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use repolist::config::Config;
use repolist::Client;
use tracing::info;

/// Run the list command
pub fn run(config: &Config, output: Output) -> Result<()> {
    let roots = super::roots(config)?;
    info!("Scanning: {:?}", roots);

    let client = Client::from_config(config);
    let index = client
        .repositories(roots)
        .context("Failed to discover repositories")?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }

    println!("Found {} repositories:", index.len());
    println!();

    for repo in &index {
        if output.color {
            println!("  {}  {}", repo.name.bold().green(), repo.path.display().dimmed());
        } else {
            println!("  {}  {}", repo.name, repo.path.display());
        }

        if let Some(description) = repo.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            println!("    {description}");
        }
    }

    Ok(())
}
