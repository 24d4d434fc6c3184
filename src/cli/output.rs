//! CLI output: exit codes and error mapping to a stable CLI surface.

use crate::error::ImgdiffError;

/// Trees are identical
pub const EXIT_MATCH: u8 = 0;
/// A file differs or is missing from one side
pub const EXIT_MISMATCH: u8 = 1;
/// Configuration, extraction or I/O failure; nothing was compared
pub const EXIT_ERROR: u8 = 2;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ImgdiffError) -> String {
    format!("imgdiff: {}", e)
}
