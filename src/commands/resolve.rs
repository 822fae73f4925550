// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Resolve command - maps a user supplied name to the stored name and path

use super::Output;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use repolist::config::Config;
use repolist::Client;

/// Run the resolve command
pub fn run(config: &Config, name: &str, output: Output) -> Result<()> {
    let roots = super::roots(config)?;
    let client = Client::from_config(config);
    let index = client
        .repositories(roots)
        .context("Failed to discover repositories")?;

    let scanner = client.scanner();
    let path = scanner.resolve_path(&index, name)?;
    let canonical = scanner.resolve_canonical_name(&index, name);

    if output.json {
        let value = serde_json::json!({ "name": canonical, "path": path });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if output.color {
        println!("{} {}", canonical.bold(), path.display());
    } else {
        println!("{} {}", canonical, path.display());
    }

    Ok(())
}
