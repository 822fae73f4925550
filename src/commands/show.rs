// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Show command - opens a repository by name and prints its basics

use super::Output;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use repolist::config::Config;
use repolist::Client;

/// Run the show command
pub fn run(config: &Config, name: &str, output: Output) -> Result<()> {
    let roots = super::roots(config)?;
    let client = Client::from_config(config);

    let index = client
        .repositories(roots)
        .context("Failed to discover repositories")?;

    let scanner = client.scanner();
    let path = scanner.resolve_path(&index, name)?;
    let canonical = scanner.resolve_canonical_name(&index, name);
    let repo = client
        .get_repository(&path)
        .with_context(|| format!("Failed to open repository {name}"))?;
    let detached = repo.current_branch()?.is_none();
    let branch = repo.head_branch()?;

    if output.json {
        let value = serde_json::json!({
            "name": canonical,
            "path": repo.path(),
            "layout": repo.layout(),
            "branch": branch,
            "detached": detached,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if output.color {
        println!("{}", canonical.bold());
    } else {
        println!("{canonical}");
    }
    println!("  path:   {}", repo.path().display());
    println!("  layout: {}", repo.layout().label());
    if detached {
        println!("  branch: {branch} (detached HEAD)");
    } else {
        println!("  branch: {branch}");
    }

    Ok(())
}
