// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository scanning - discovers git repositories below a set of roots
//! and resolves user supplied names against the result

use crate::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Upper bound for a `description` file read, in bytes
pub const DEFAULT_MAX_DESCRIPTION_BYTES: u64 = 64 * 1024;

/// Scanner settings, fixed for the lifetime of a scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Branch reported when a repository's HEAD is detached
    pub default_branch: String,
    /// Repository paths excluded from discovery; relative ones are taken
    /// from the current directory, like relative roots
    pub hidden: HashSet<PathBuf>,
    /// Let a case-insensitive name match decide which path a name resolves to
    pub case_insensitive_lookup: bool,
    /// Descend through symlinked directories (link loops are detected and skipped)
    pub follow_symlinks: bool,
    /// Descriptions longer than this are truncated
    pub max_description_bytes: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            default_branch: "master".to_string(),
            hidden: HashSet::new(),
            case_insensitive_lookup: false,
            follow_symlinks: true,
            max_description_bytes: DEFAULT_MAX_DESCRIPTION_BYTES,
        }
    }
}

/// Walks directory trees looking for bare and working-copy repositories
#[derive(Debug, Clone, Default)]
pub struct RepositoryScanner {
    config: ScannerConfig,
}

impl RepositoryScanner {
    /// Create a scanner with the given settings
    #[must_use]
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// The scanner settings
    #[must_use]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Discover all repositories below `roots`.
    ///
    /// Results of later roots replace same-named results of earlier ones.
    /// The returned index is sorted by lowercased name, descending.
    ///
    /// # Errors
    ///
    /// Fails on the first root that cannot be listed or that holds no
    /// repositories; nothing is returned for the other roots in that case.
    pub fn discover<P: AsRef<Path>>(&self, roots: &[P]) -> Result<RepositoryIndex> {
        let hidden = self
            .config
            .hidden
            .iter()
            .map(|path| absolute(path))
            .collect::<Result<HashSet<_>>>()?;
        let mut all = RepositoryIndex::new();

        for root in roots {
            let root = absolute(root.as_ref())?;
            let found = self.scan_root(&root, &hidden)?;

            if found.is_empty() {
                return Err(Error::NoRepositoriesFound { path: root });
            }

            info!("Found {} repositories in {}", found.len(), root.display());
            all.merge(found);
        }

        all.dedup();
        all.sort_descending();

        Ok(all)
    }

    /// Path of the repository called `name`.
    ///
    /// With case-insensitive lookup enabled the first key matching `name`
    /// ignoring case wins, even over a differently cased exact match.
    ///
    /// # Errors
    ///
    /// [`Error::RepositoryNotFound`] when nothing matches.
    pub fn resolve_path(&self, index: &RepositoryIndex, name: &str) -> Result<PathBuf> {
        let mut path = index.get(name).map(|d| d.path.clone());

        if self.config.case_insensitive_lookup {
            if let Some(found) = index.find_ignore_case(name) {
                path = Some(found.path.clone());
            }
        }

        path.ok_or_else(|| Error::RepositoryNotFound { name: name.to_string() })
    }

    /// Stored spelling of `name`, or `name` itself when nothing matches
    #[must_use]
    pub fn resolve_canonical_name(&self, index: &RepositoryIndex, name: &str) -> String {
        index
            .find_ignore_case(name)
            .map_or_else(|| name.to_string(), |d| d.name.clone())
    }

    /// Walk a single root
    fn scan_root(&self, root: &Path, hidden: &HashSet<PathBuf>) -> Result<RepositoryIndex> {
        let metadata = fs::metadata(root).map_err(|source| Error::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory { path: root.to_path_buf() });
        }
        fs::read_dir(root).map_err(|source| Error::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut found = RepositoryIndex::new();
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_dot_entry(entry));

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if let Err(err) = fs::read_dir(entry.path()) {
                debug!("Skipping unreadable directory {}: {}", entry.path().display(), err);
                walker.skip_current_dir();
                continue;
            }

            // Plain directories are descended into by the walker
            let Some(layout) = Layout::detect(entry.path()) else {
                continue;
            };
            walker.skip_current_dir();

            if hidden.contains(entry.path()) {
                debug!("Hiding {}", entry.path().display());
                continue;
            }

            let descriptor = self.describe(&entry, layout);
            debug!("Discovered {} at {}", descriptor.name, descriptor.path.display());
            found.insert(descriptor);
        }

        Ok(found)
    }

    /// Build the descriptor for a repository directory
    fn describe(&self, entry: &DirEntry, layout: Layout) -> RepositoryDescriptor {
        let dir_name = entry.file_name().to_string_lossy();
        let name = if entry.depth() == 1 {
            dir_name.into_owned()
        } else {
            let parent = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{parent}/{dir_name}")
        };

        RepositoryDescriptor {
            name,
            path: entry.path().to_path_buf(),
            description: self.read_description(&layout.description_path(entry.path())),
        }
    }

    fn read_description(&self, path: &Path) -> Option<String> {
        let file = fs::File::open(path).ok()?;
        let limit = self.config.max_description_bytes;

        let mut buf = Vec::new();
        if let Err(err) = file.take(limit).read_to_end(&mut buf) {
            debug!("Cannot read {}: {}", path.display(), err);
            return None;
        }

        let oversized = fs::metadata(path).map(|m| m.len() > limit).unwrap_or(false);
        if oversized {
            warn!("Truncated {} to {} bytes", path.display(), limit);
        }

        Some(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Names starting with a dot are never reported nor walked
fn is_dot_entry(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_working_copy(root: &Path, rel: &str, description: Option<&str>) -> PathBuf {
        let dir = root.join(rel);
        fs::create_dir_all(dir.join(".git")).unwrap();
        fs::write(dir.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        if let Some(text) = description {
            fs::write(dir.join(".git/description"), text).unwrap();
        }
        dir
    }

    fn make_bare(root: &Path, rel: &str, description: Option<&str>) -> PathBuf {
        let dir = root.join(rel);
        fs::create_dir_all(dir.join("refs/heads")).unwrap();
        fs::write(dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        if let Some(text) = description {
            fs::write(dir.join("description"), text).unwrap();
        }
        dir
    }

    #[test]
    fn test_top_level_and_nested_names() {
        let root = TempDir::new().unwrap();
        make_working_copy(root.path(), "project", None);
        make_working_copy(root.path(), "group/nested", None);
        make_bare(root.path(), "a/b/deep.git", None);

        let index = RepositoryScanner::default().discover(&[root.path()]).unwrap();

        assert_eq!(index.names(), vec!["project", "group/nested", "b/deep.git"]);
    }

    #[test]
    fn test_descriptions_follow_layout() {
        let root = TempDir::new().unwrap();
        let bare = make_bare(root.path(), "bare.git", Some("Bare one\n"));
        make_working_copy(root.path(), "work", Some("Working one"));
        make_working_copy(root.path(), "plain", None);

        let index = RepositoryScanner::default().discover(&[root.path()]).unwrap();

        let bare_desc = index.get("bare.git").unwrap();
        assert_eq!(bare_desc.path, bare);
        assert_eq!(bare_desc.description.as_deref(), Some("Bare one\n"));
        assert_eq!(index.get("work").unwrap().description.as_deref(), Some("Working one"));
        assert_eq!(index.get("plain").unwrap().description, None);
    }

    #[test]
    fn test_repositories_are_not_descended_into() {
        let root = TempDir::new().unwrap();
        let outer = make_working_copy(root.path(), "outer", None);
        make_working_copy(&outer, "vendored", None);

        let index = RepositoryScanner::default().discover(&[root.path()]).unwrap();

        assert_eq!(index.names(), vec!["outer"]);
    }

    #[test]
    fn test_dot_directories_are_ignored() {
        let root = TempDir::new().unwrap();
        make_working_copy(root.path(), ".cache/secret", None);
        make_working_copy(root.path(), ".dotrepo", None);
        make_working_copy(root.path(), "visible", None);

        let index = RepositoryScanner::default().discover(&[root.path()]).unwrap();

        assert_eq!(index.names(), vec!["visible"]);
    }

    #[test]
    fn test_hidden_repository_and_its_children_are_skipped() {
        let root = TempDir::new().unwrap();
        let hidden = make_working_copy(root.path(), "private", None);
        make_working_copy(&hidden, "inner", None);
        make_working_copy(root.path(), "public", None);

        let scanner = RepositoryScanner::new(ScannerConfig {
            hidden: [hidden].into_iter().collect(),
            ..Default::default()
        });
        let index = scanner.discover(&[root.path()]).unwrap();

        assert_eq!(index.names(), vec!["public"]);
    }

    #[test]
    fn test_root_without_repositories_fails() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("just/folders")).unwrap();

        let err = RepositoryScanner::default().discover(&[root.path()]).unwrap_err();

        assert!(matches!(err, Error::NoRepositoriesFound { path } if path == root.path()));
    }

    #[test]
    fn test_missing_root_is_not_an_empty_root() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nope");

        let err = RepositoryScanner::default().discover(&[&missing]).unwrap_err();
        assert!(matches!(err, Error::RootUnreadable { .. }));

        let file = root.path().join("file");
        fs::write(&file, "x").unwrap();
        let err = RepositoryScanner::default().discover(&[&file]).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn test_one_empty_root_aborts_discovery() {
        let good = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        make_working_copy(good.path(), "fine", None);

        let err = RepositoryScanner::default()
            .discover(&[good.path(), empty.path()])
            .unwrap_err();

        assert!(matches!(err, Error::NoRepositoriesFound { path } if path == empty.path()));
    }

    #[test]
    fn test_later_root_wins_on_name_collision() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_working_copy(first.path(), "shared", None);
        let winner = make_bare(second.path(), "shared", None);

        let index = RepositoryScanner::default()
            .discover(&[first.path(), second.path()])
            .unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("shared").unwrap().path, winner);
    }

    #[test]
    fn test_description_is_capped() {
        let root = TempDir::new().unwrap();
        make_bare(root.path(), "big.git", Some(&"x".repeat(100)));

        let scanner = RepositoryScanner::new(ScannerConfig {
            max_description_bytes: 10,
            ..Default::default()
        });
        let index = scanner.discover(&[root.path()]).unwrap();

        assert_eq!(index.get("big.git").unwrap().description.as_deref(), Some("xxxxxxxxxx"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_repository_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let locked = make_working_copy(root.path(), "locked", None);
        make_working_copy(root.path(), "open", None);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o311)).unwrap();

        // Privileged users read through missing permission bits
        let privileged = fs::read_dir(&locked).is_ok();
        let result = RepositoryScanner::default().discover(&[root.path()]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let index = result.unwrap();
        if privileged {
            assert_eq!(index.names(), vec!["open", "locked"]);
        } else {
            assert_eq!(index.names(), vec!["open"]);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_skipped() {
        let root = TempDir::new().unwrap();
        make_working_copy(root.path(), "real", None);
        fs::create_dir(root.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(root.path(), root.path().join("loop/back")).unwrap();

        let index = RepositoryScanner::default().discover(&[root.path()]).unwrap();

        assert_eq!(index.names(), vec!["real"]);
    }

    #[test]
    fn test_resolve_path_exact_and_case_insensitive() {
        let root = TempDir::new().unwrap();
        let path = make_working_copy(root.path(), "MyRepo", None);

        let strict = RepositoryScanner::default();
        let index = strict.discover(&[root.path()]).unwrap();
        assert_eq!(strict.resolve_path(&index, "MyRepo").unwrap(), path);
        assert!(matches!(
            strict.resolve_path(&index, "myrepo"),
            Err(Error::RepositoryNotFound { .. })
        ));

        let relaxed = RepositoryScanner::new(ScannerConfig {
            case_insensitive_lookup: true,
            ..Default::default()
        });
        assert_eq!(relaxed.resolve_path(&index, "myrepo").unwrap(), path);
        assert_eq!(relaxed.resolve_canonical_name(&index, "myrepo"), "MyRepo");
    }

    #[test]
    fn test_case_insensitive_hit_overrides_exact_match() {
        let first = RepositoryDescriptor {
            name: "MYREPO".into(),
            path: PathBuf::from("/srv/git/MYREPO"),
            description: None,
        };
        let exact = RepositoryDescriptor {
            name: "myrepo".into(),
            path: PathBuf::from("/srv/git/myrepo"),
            description: None,
        };
        let index = RepositoryIndex::from_descriptors([first, exact]);

        let scanner = RepositoryScanner::new(ScannerConfig {
            case_insensitive_lookup: true,
            ..Default::default()
        });

        // The first case-insensitive hit in index order wins over the exact key
        assert_eq!(
            scanner.resolve_path(&index, "myrepo").unwrap(),
            PathBuf::from("/srv/git/MYREPO")
        );
        assert_eq!(
            RepositoryScanner::default().resolve_path(&index, "myrepo").unwrap(),
            PathBuf::from("/srv/git/myrepo")
        );
    }

    #[test]
    fn test_canonical_name_falls_back_to_input() {
        let index = RepositoryIndex::new();
        assert_eq!(RepositoryScanner::default().resolve_canonical_name(&index, "Ghost"), "Ghost");
    }
}
