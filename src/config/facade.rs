//! Config loading facade: assembles sources in precedence order and validates.

use super::merge::merge_policy;
use super::sources::{environment, explicit_file, global_file};
use super::ImgdiffConfig;
use crate::error::ConfigError;
use std::path::Path;
use tracing::debug;

/// Loads [`ImgdiffConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a run
    ///
    /// Precedence (lowest to highest): defaults, global file, `explicit`
    /// file, environment.
    pub fn load(explicit: Option<&Path>) -> Result<ImgdiffConfig, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            debug!(config_path = %path.display(), "Loading explicit configuration");
            builder = explicit_file::add_to_builder(builder, path)?;
        }
        builder = environment::add_to_builder(builder)?;

        let config: ImgdiffConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load configuration from defaults and a single file only
    pub fn load_from_file(path: &Path) -> Result<ImgdiffConfig, ConfigError> {
        let builder = explicit_file::add_to_builder(merge_policy::builder_with_defaults()?, path)?;
        let config: ImgdiffConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Built-in defaults, no files or environment
    pub fn default() -> ImgdiffConfig {
        ImgdiffConfig::default()
    }

    fn validated(config: ImgdiffConfig) -> Result<ImgdiffConfig, ConfigError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Invalid(error_msgs.join("; "))
        })?;
        Ok(config)
    }
}
