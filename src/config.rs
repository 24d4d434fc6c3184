//! Configuration System
//!
//! Layered configuration: built-in defaults, the user's global config file,
//! an explicit `--config` file, then `IMGDIFF__*` environment variables. CLI
//! flags are applied on top by the caller.

use crate::deep_diff::DeepDiffConfig;
use crate::logging::LoggingConfig;
use crate::report::ReportConfig;
use crate::tree::hasher::DEFAULT_CHUNK_SIZE;
use crate::tree::{SymlinkPolicy, WalkerConfig};
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImgdiffConfig {
    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub deep_diff: DeepDiffConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree walking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Symlink handling: target, follow, skip
    #[serde(default)]
    pub symlinks: SymlinkPolicy,

    /// Read size in bytes when digesting files
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            symlinks: SymlinkPolicy::default(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Chunk size must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            symlinks: self.symlinks,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Walk(String),
    DeepDiff(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Walk(msg) => write!(f, "walk: {}", msg),
            ValidationError::DeepDiff(msg) => write!(f, "deep_diff: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ImgdiffConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.walk.validate() {
            errors.push(ValidationError::Walk(e));
        }
        if let Err(e) = self.deep_diff.validate() {
            errors.push(ValidationError::DeepDiff(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
