//! Error types for the image comparison tool.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while walking and hashing one tree
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk directory {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Errors raised while turning a CLI input into a directory to compare
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported image {0}: expected a directory or a .tar, .tar.bz2 or .tar.gz archive")]
    Unsupported(PathBuf),

    #[error("Error unpacking image {path}: {message}")]
    Extract { path: PathBuf, message: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Top-level error for a comparison run
#[derive(Debug, Error)]
pub enum ImgdiffError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write report: {0}")]
    Output(#[source] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
