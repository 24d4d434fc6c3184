//! Tree builder: walks one image root and digests every entry

use crate::error::TreeError;
use crate::tree::hasher::{self, DEFAULT_CHUNK_SIZE};
use crate::tree::path;
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use crate::types::{Digest, EntryKind};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// One comparable file of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Relative key, `/` separated
    pub relative_path: String,
    /// Absolute location on disk, handed to the deep-diff tool
    pub source_path: PathBuf,
    pub digest: Digest,
    pub kind: EntryKind,
    pub size: u64,
}

/// All comparable files of one image, keyed by relative path
#[derive(Debug, Clone)]
pub struct Tree {
    root: PathBuf,
    entries: BTreeMap<String, FileEntry>,
}

impl Tree {
    /// Canonical root directory the tree was built from
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, relative_path: &str) -> Option<&FileEntry> {
        self.entries.get(relative_path)
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.entries.contains_key(relative_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in lexicographic key order
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    /// Directories that hold at least one entry, as relative keys
    ///
    /// The root itself is reported as `.`.
    pub fn directories(&self) -> BTreeSet<&str> {
        self.entries
            .keys()
            .map(|key| path::parent_key(key).unwrap_or("."))
            .collect()
    }
}

/// Tree builder for one image root
pub struct TreeBuilder {
    root: PathBuf,
    walker_config: WalkerConfig,
    chunk_size: usize,
}

impl TreeBuilder {
    /// Create a new tree builder for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            walker_config: WalkerConfig::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set walker config (symlink policy)
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the read size used when streaming file content
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Walk the root and digest every entry
    ///
    /// Any read failure aborts the build; a partial tree is never returned.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<Tree, TreeError> {
        let start = Instant::now();
        info!("Starting tree build");

        if !self.root.is_dir() {
            return Err(TreeError::NotADirectory(self.root.clone()));
        }
        let root = path::canonicalize_root(&self.root)?;

        let walker = Walker::with_config(root.clone(), self.walker_config.clone());
        let walked = match walker.walk() {
            Ok(e) => {
                debug!(entry_count = e.len(), "Walked filesystem");
                e
            }
            Err(e) => {
                error!("Filesystem walk failed: {}", e);
                return Err(e);
            }
        };

        let mut entries = BTreeMap::new();
        let mut total_bytes = 0u64;
        for entry in walked {
            let file_entry = self.digest_entry(&root, entry)?;
            total_bytes += file_entry.size;
            entries.insert(file_entry.relative_path.clone(), file_entry);
        }

        info!(
            file_count = entries.len(),
            total_bytes,
            duration_ms = start.elapsed().as_millis(),
            "Tree build completed"
        );

        Ok(Tree { root, entries })
    }

    fn digest_entry(&self, root: &Path, entry: Entry) -> Result<FileEntry, TreeError> {
        let relative_path = path::relative_key(root, entry.path())?;
        let file_entry = match entry {
            Entry::File { path, size } => {
                let digest = hasher::compute_file_digest(&path, self.chunk_size).map_err(|e| {
                    error!(path = %path.display(), "Failed to digest file: {}", e);
                    e
                })?;
                FileEntry {
                    relative_path,
                    source_path: path,
                    digest,
                    kind: EntryKind::File,
                    size,
                }
            }
            Entry::Symlink { path, target } => FileEntry {
                relative_path,
                source_path: path,
                digest: hasher::compute_symlink_digest(&target),
                kind: EntryKind::Symlink,
                size: 0,
            },
        };
        trace!(
            path = %file_entry.relative_path,
            digest = %hex::encode(file_entry.digest),
            "Digested entry"
        );
        Ok(file_entry)
    }
}

/// Build the tree of `root` with default settings
pub fn build_tree(root: &Path) -> Result<Tree, TreeError> {
    TreeBuilder::new(root.to_path_buf()).build()
}
