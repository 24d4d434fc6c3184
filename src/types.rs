//! Shared value types

use serde::{Deserialize, Serialize};

/// BLAKE3 digest of one tree entry (32 bytes)
pub type Digest = [u8; 32];

/// Kind of filesystem object a tree entry was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file, digest covers its full content
    File,
    /// Unfollowed symlink, digest covers its target path
    Symlink,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Symlink => write!(f, "symlink"),
        }
    }
}
