//! Config facade: one entry point over defaults, files and environment.

use super::{merge, sources, BackdropConfig};
use crate::error::BackdropError;
use std::path::Path;

/// Loads [`BackdropConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, reading files from `config_dir`.
    ///
    /// Order (later wins): defaults, backdrop.toml, backdrop.{BACKDROP_ENV}.toml,
    /// BACKDROP__* environment variables.
    pub fn load(config_dir: &Path) -> Result<BackdropConfig, BackdropError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::config_file::add_to_builder(builder, config_dir);
        let builder = sources::environment::add_to_builder(builder);
        Self::finish(builder)
    }

    /// Load configuration from defaults and environment only.
    pub fn load_from_env() -> Result<BackdropConfig, BackdropError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::environment::add_to_builder(builder);
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<BackdropConfig, BackdropError> {
        let config: BackdropConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
