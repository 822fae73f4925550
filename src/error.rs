// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Library error type

use std::path::PathBuf;

/// Result alias for library operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while discovering, resolving or opening repositories
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scan root was listed successfully but held no repositories
    #[error("There are no git repositories in {}", path.display())]
    NoRepositoriesFound {
        /// The scan root
        path: PathBuf,
    },

    /// A scan root could not be listed
    #[error("Cannot read repository root {}", path.display())]
    RootUnreadable {
        /// The scan root
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A scan root exists but is not a directory
    #[error("Repository root {} is not a directory", path.display())]
    NotADirectory {
        /// The scan root
        path: PathBuf,
    },

    /// No repository in the index matches the requested name
    #[error("Repository not found: {name}")]
    RepositoryNotFound {
        /// Name as supplied by the caller
        name: String,
    },

    /// A working copy already lives at the target path
    #[error("A git repository already exists at {}", path.display())]
    AlreadyExists {
        /// Target path
        path: PathBuf,
    },

    /// Path does not hold a git repository
    #[error("There is no git repository at {}", path.display())]
    NotFound {
        /// Requested path
        path: PathBuf,
    },

    /// The git library refused to open a repository
    #[error("Failed to open repository at {}", path.display())]
    Open {
        /// Requested path
        path: PathBuf,
        /// Underlying git error
        #[source]
        source: Box<gix::open::Error>,
    },

    /// The git library refused to create a repository
    #[error("Failed to create repository at {}", path.display())]
    Init {
        /// Target path
        path: PathBuf,
        /// Underlying git error
        #[source]
        source: Box<gix::init::Error>,
    },

    /// Reading HEAD failed
    #[error("Failed to read HEAD of {}", path.display())]
    Head {
        /// Repository path
        path: PathBuf,
        /// Underlying git error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Configuration could not be loaded
    #[error("Invalid configuration")]
    Config(#[from] config::ConfigError),

    /// Any other I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
