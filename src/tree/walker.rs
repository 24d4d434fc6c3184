//! Filesystem walker for traversing an image root

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How symbolic links inside an image are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkPolicy {
    /// Do not follow; compare links by their target path
    #[default]
    Target,
    /// Follow links to regular files, skip dangling links
    Follow,
    /// Ignore links entirely
    Skip,
}

impl std::fmt::Display for SymlinkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymlinkPolicy::Target => write!(f, "target"),
            SymlinkPolicy::Follow => write!(f, "follow"),
            SymlinkPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Filesystem entry types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A regular file (or a followed link to one) with its size
    File { path: PathBuf, size: u64 },
    /// An unfollowed symlink with its target
    Symlink { path: PathBuf, target: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &PathBuf {
        match self {
            Entry::File { path, .. } | Entry::Symlink { path, .. } => path,
        }
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    pub symlinks: SymlinkPolicy,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect every comparable entry
    ///
    /// Directories are traversed but not returned. Special files are skipped.
    /// Entries come back sorted by path.
    pub fn walk(&self) -> Result<Vec<Entry>, TreeError> {
        let follow = self.config.symlinks == SymlinkPolicy::Follow;
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(follow)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if follow && is_unresolvable_link(&e) => {
                    warn!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping symlink that does not resolve to a file"
                    );
                    continue;
                }
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                    return Err(TreeError::Walk { path, source: e });
                }
            };

            let path = entry.path().to_path_buf();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                continue;
            }

            if file_type.is_symlink() {
                match self.config.symlinks {
                    SymlinkPolicy::Target => {
                        let target = std::fs::read_link(&path).map_err(|source| {
                            TreeError::Read {
                                path: path.clone(),
                                source,
                            }
                        })?;
                        entries.push(Entry::Symlink { path, target });
                    }
                    // A followed link reports its target's type, so reaching here
                    // means walkdir handed back the link itself.
                    SymlinkPolicy::Follow | SymlinkPolicy::Skip => {
                        debug!(path = %path.display(), "Skipping symlink");
                    }
                }
                continue;
            }

            if file_type.is_file() {
                let metadata = entry.metadata().map_err(|e| TreeError::Walk {
                    path: path.clone(),
                    source: e,
                })?;
                entries.push(Entry::File {
                    path,
                    size: metadata.len(),
                });
                continue;
            }

            warn!(path = %path.display(), "Skipping special file");
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(entries)
    }
}

/// Dangling links and link cycles only surface as walk errors when following
fn is_unresolvable_link(error: &walkdir::Error) -> bool {
    if error.loop_ancestor().is_some() {
        return true;
    }
    let Some(path) = error.path() else {
        return false;
    };
    let not_found = error
        .io_error()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false);
    not_found
        && std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
}
