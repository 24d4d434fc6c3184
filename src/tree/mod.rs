//! Image file trees
//!
//! Walks one image root and maps every comparable file to a digest of its
//! content, keyed by its platform independent relative path.

pub mod builder;
pub mod hasher;
pub mod path;
pub mod walker;

pub use builder::{build_tree, FileEntry, Tree, TreeBuilder};
pub use walker::{SymlinkPolicy, WalkerConfig};
