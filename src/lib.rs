//! imgdiff: Binary Diff of Built Filesystem Images
//!
//! Compares two images (unpacked directories or tar archives) file by file
//! using content digests, for build reproducibility checks.
//!
//! ```no_run
//! use imgdiff::{build_tree, compare};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), imgdiff::error::TreeError> {
//! let left = build_tree(Path::new("build-1/rootfs"))?;
//! let right = build_tree(Path::new("build-2/rootfs"))?;
//! let result = compare(&left, &right);
//! for path in &result.different {
//!     println!("differs: {}", path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compare;
pub mod config;
pub mod deep_diff;
pub mod error;
pub mod image;
pub mod logging;
pub mod report;
pub mod tree;
pub mod types;

pub use compare::{compare, ComparisonResult};
pub use tree::{build_tree, Tree};
