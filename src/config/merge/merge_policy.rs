//! Merge rules: defaults, override order, conflict handling.

use crate::tree::hasher::DEFAULT_CHUNK_SIZE;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key; tables merge, arrays replace.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("walk.symlinks", "target")?
        .set_default("walk.chunk_size", DEFAULT_CHUNK_SIZE as i64)?
        .set_default("deep_diff.program", "diffoscope")?
        .set_default("report.color", true)?
        .set_default("report.format", "text")?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")
}
