// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository client - opens and creates repositories through gix, on top of
//! the scanner's discovery and name resolution

use crate::config::Config;
use crate::prelude::*;
use crate::scanner::{RepositoryScanner, ScannerConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entry point for listing, resolving, opening and creating repositories
#[derive(Debug, Clone, Default)]
pub struct Client {
    scanner: RepositoryScanner,
}

impl Client {
    /// Create a client from scanner settings
    #[must_use]
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            scanner: RepositoryScanner::new(config),
        }
    }

    /// Create a client from the application configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scanner_config())
    }

    /// The underlying scanner
    #[must_use]
    pub fn scanner(&self) -> &RepositoryScanner {
        &self.scanner
    }

    /// Branch used when a repository's HEAD is detached
    #[must_use]
    pub fn default_branch(&self) -> &str {
        &self.scanner.config().default_branch
    }

    /// Discover repositories below `roots`
    ///
    /// # Errors
    ///
    /// See [`RepositoryScanner::discover`].
    pub fn repositories<P: AsRef<Path>>(&self, roots: &[P]) -> Result<RepositoryIndex> {
        self.scanner.discover(roots)
    }

    /// Open the repository called `name` below `roots`
    ///
    /// # Errors
    ///
    /// Discovery and resolution errors, or [`Client::get_repository`] errors.
    pub fn repository_from_name<P: AsRef<Path>>(&self, roots: &[P], name: &str) -> Result<Repository> {
        let index = self.scanner.discover(roots)?;
        let path = self.scanner.resolve_path(&index, name)?;
        self.get_repository(&path)
    }

    /// Stored spelling of `name` below `roots`
    ///
    /// # Errors
    ///
    /// Discovery errors only; an unknown name is returned unchanged.
    pub fn repository_name_from_name<P: AsRef<Path>>(&self, roots: &[P], name: &str) -> Result<String> {
        let index = self.scanner.discover(roots)?;
        Ok(self.scanner.resolve_canonical_name(&index, name))
    }

    /// Initialise a new repository at `path`
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyExists`] when `path` already holds a working copy,
    /// [`Error::Init`] when gix cannot create the repository.
    pub fn create_repository(&self, path: &Path, bare: bool) -> Result<Repository> {
        if path.join(".git").join("HEAD").exists() && !path.join("HEAD").exists() {
            return Err(Error::AlreadyExists { path: path.to_path_buf() });
        }

        debug!("Creating {} repository at {}", if bare { "bare" } else { "working copy" }, path.display());
        let created = if bare { gix::init_bare(path) } else { gix::init(path) };
        let inner = created.map_err(|source| Error::Init {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        Ok(self.wrap(inner, path))
    }

    /// Open the repository at `path`
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] unless `path` carries a `HEAD` or `.git/HEAD`,
    /// [`Error::Open`] when gix rejects it.
    pub fn get_repository(&self, path: &Path) -> Result<Repository> {
        if !path.exists() || Layout::detect(path).is_none() {
            return Err(Error::NotFound { path: path.to_path_buf() });
        }

        let inner = gix::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        Ok(self.wrap(inner, path))
    }

    fn wrap(&self, inner: gix::Repository, path: &Path) -> Repository {
        Repository {
            inner,
            path: path.to_path_buf(),
            default_branch: self.default_branch().to_string(),
        }
    }
}

/// An opened repository
pub struct Repository {
    inner: gix::Repository,
    path: PathBuf,
    default_branch: String,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .field("bare", &self.is_bare())
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Path the repository was opened or created at
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.git` directory, or the root itself for bare repositories
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.git_dir()
    }

    /// Whether the repository has no working tree
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.inner.is_bare()
    }

    /// Bare or working copy
    #[must_use]
    pub fn layout(&self) -> Layout {
        if self.is_bare() {
            Layout::Bare
        } else {
            Layout::WorkingCopy
        }
    }

    /// Branch HEAD points at, or `None` when detached
    ///
    /// # Errors
    ///
    /// [`Error::Head`] when HEAD cannot be read.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.inner.head_name().map_err(|err| Error::Head {
            path: self.path.clone(),
            source: Box::new(err),
        })?;

        Ok(head.map(|name| name.shorten().to_string()))
    }

    /// Checked out branch, falling back to the default branch when detached
    ///
    /// # Errors
    ///
    /// [`Error::Head`] when HEAD cannot be read.
    pub fn head_branch(&self) -> Result<String> {
        Ok(self
            .current_branch()?
            .unwrap_or_else(|| self.default_branch.clone()))
    }
}
