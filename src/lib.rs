// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Repolist library - find the git repositories living under a set of roots
//!
//! This crate discovers bare and working-copy repositories beneath one or
//! more directories, resolves user-supplied (possibly mis-cased) names to
//! the stored ones, and opens or creates repositories through `gix`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod scanner;

pub use client::{Client, Repository};
pub use error::{Error, Result};
pub use scanner::{RepositoryScanner, ScannerConfig};

/// Core data types produced by discovery
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::collections::{HashMap, HashSet};
    use std::path::{Path, PathBuf};

    // =========================================================================
    // Repository Descriptor
    // =========================================================================

    /// How a discovered repository is laid out on disk
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Layout {
        /// `HEAD` sits directly in the repository root
        Bare,
        /// `HEAD` sits in `.git/` below a working directory
        WorkingCopy,
    }

    impl Layout {
        /// Classify `dir`; the bare marker wins when both are present
        #[must_use]
        pub fn detect(dir: &Path) -> Option<Self> {
            if dir.join("HEAD").exists() {
                Some(Self::Bare)
            } else if dir.join(".git").join("HEAD").exists() {
                Some(Self::WorkingCopy)
            } else {
                None
            }
        }

        /// Location of the `description` file for a repository rooted at `dir`
        #[must_use]
        pub fn description_path(self, dir: &Path) -> PathBuf {
            match self {
                Self::Bare => dir.join("description"),
                Self::WorkingCopy => dir.join(".git").join("description"),
            }
        }

        /// Human readable label
        #[must_use]
        pub fn label(self) -> &'static str {
            match self {
                Self::Bare => "bare",
                Self::WorkingCopy => "working copy",
            }
        }
    }

    /// A repository found during discovery
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RepositoryDescriptor {
        /// Display name: `dir` at the top level, `parent/dir` below it
        pub name: String,
        /// Absolute path to the repository root
        pub path: PathBuf,
        /// Contents of the repository's `description` file, if any
        pub description: Option<String>,
    }

    // =========================================================================
    // Repository Index
    // =========================================================================

    /// Ordered name -> descriptor mapping with unique, case-sensitive keys
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
    #[serde(transparent)]
    pub struct RepositoryIndex {
        entries: Vec<RepositoryDescriptor>,
        /// Name -> position in `entries`
        #[serde(skip)]
        positions: HashMap<String, usize>,
    }

    impl RepositoryIndex {
        /// Create an empty index
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Build an index keeping the given order; later duplicates of a name
        /// replace the earlier entry in place
        #[must_use]
        pub fn from_descriptors(descriptors: impl IntoIterator<Item = RepositoryDescriptor>) -> Self {
            let mut index = Self::new();
            index.extend(descriptors);
            index
        }

        /// Insert a descriptor, overwriting any entry with the same name
        pub fn insert(&mut self, descriptor: RepositoryDescriptor) {
            if let Some(&pos) = self.positions.get(&descriptor.name) {
                self.entries[pos] = descriptor;
            } else {
                self.positions.insert(descriptor.name.clone(), self.entries.len());
                self.entries.push(descriptor);
            }
        }

        /// Merge another index into this one; entries of `other` win
        pub fn merge(&mut self, other: Self) {
            self.extend(other.entries);
        }

        /// Exact, case-sensitive lookup
        #[must_use]
        pub fn get(&self, name: &str) -> Option<&RepositoryDescriptor> {
            self.positions.get(name).map(|&pos| &self.entries[pos])
        }

        /// First entry whose name matches ignoring ASCII case
        #[must_use]
        pub fn find_ignore_case(&self, name: &str) -> Option<&RepositoryDescriptor> {
            self.entries.iter().find(|d| d.name.eq_ignore_ascii_case(name))
        }

        /// Drop descriptors that are equal in every field to an earlier one
        pub fn dedup(&mut self) {
            let keep: Vec<bool> = {
                let mut seen = HashSet::with_capacity(self.entries.len());
                self.entries.iter().map(|d| seen.insert(d)).collect()
            };
            if keep.iter().all(|&k| k) {
                return;
            }

            let mut keep = keep.into_iter();
            self.entries.retain(|_| keep.next().unwrap_or(true));
            self.reindex();
        }

        /// Sort by lowercased name, descending; ties keep their current order
        pub fn sort_descending(&mut self) {
            let mut keyed: Vec<(String, RepositoryDescriptor)> = self
                .entries
                .drain(..)
                .map(|d| (d.name.to_lowercase(), d))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
            self.entries = keyed.into_iter().map(|(_, d)| d).collect();
            self.reindex();
        }

        fn reindex(&mut self) {
            self.positions = self
                .entries
                .iter()
                .enumerate()
                .map(|(pos, d)| (d.name.clone(), pos))
                .collect();
        }

        /// Iterate descriptors in index order
        pub fn iter(&self) -> std::slice::Iter<'_, RepositoryDescriptor> {
            self.entries.iter()
        }

        /// Names in index order
        #[must_use]
        pub fn names(&self) -> Vec<&str> {
            self.entries.iter().map(|d| d.name.as_str()).collect()
        }

        /// Number of repositories
        #[must_use]
        pub fn len(&self) -> usize {
            self.entries.len()
        }

        /// Check if the index is empty
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }

    impl Extend<RepositoryDescriptor> for RepositoryIndex {
        fn extend<T: IntoIterator<Item = RepositoryDescriptor>>(&mut self, iter: T) {
            for descriptor in iter {
                self.insert(descriptor);
            }
        }
    }

    impl IntoIterator for RepositoryIndex {
        type Item = RepositoryDescriptor;
        type IntoIter = std::vec::IntoIter<RepositoryDescriptor>;

        fn into_iter(self) -> Self::IntoIter {
            self.entries.into_iter()
        }
    }

    impl<'a> IntoIterator for &'a RepositoryIndex {
        type Item = &'a RepositoryDescriptor;
        type IntoIter = std::slice::Iter<'a, RepositoryDescriptor>;

        fn into_iter(self) -> Self::IntoIter {
            self.entries.iter()
        }
    }

}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::*;
}
