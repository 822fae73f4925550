// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `REPOLIST_*` environment variables. Command line flags are applied on top
//! by the binary.

use crate::error::Result;
use crate::scanner::{ScannerConfig, DEFAULT_MAX_DESCRIPTION_BYTES};
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `REPOLIST_DEFAULT_BRANCH`
pub const ENV_PREFIX: &str = "REPOLIST";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories scanned for repositories
    pub repositories: Vec<PathBuf>,
    /// Branch shown for repositories with a detached HEAD
    pub default_branch: String,
    /// Repository paths never listed
    pub hidden: Vec<PathBuf>,
    /// Resolve repository names ignoring case
    pub case_insensitive_url: bool,
    /// Follow symlinked directories while scanning
    pub follow_symlinks: bool,
    /// Cap for `description` file reads
    pub max_description_bytes: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let scanner = ScannerConfig::default();
        Self {
            repositories: Vec::new(),
            default_branch: scanner.default_branch,
            hidden: Vec::new(),
            case_insensitive_url: scanner.case_insensitive_lookup,
            follow_symlinks: scanner.follow_symlinks,
            max_description_bytes: DEFAULT_MAX_DESCRIPTION_BYTES,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Scanner settings derived from this configuration
    #[must_use]
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            default_branch: self.default_branch.clone(),
            hidden: self.hidden.iter().cloned().collect(),
            case_insensitive_lookup: self.case_insensitive_url,
            follow_symlinks: self.follow_symlinks,
            max_description_bytes: self.max_description_bytes,
        }
    }
}

/// Default location of the configuration file
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "hyperpolymath", "repolist")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from disk and environment, or use defaults.
///
/// An explicit `path` must exist; the default location is optional.
///
/// # Errors
///
/// Returns [`crate::Error::Config`] for unreadable or malformed sources.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut builder = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?);

    match path {
        Some(path) => {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        None => {
            if let Some(path) = default_path() {
                builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false));
            }
        }
    }

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("repositories")
                .with_list_parse_key("hidden"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
