//! File source: backdrop.toml and backdrop.{BACKDROP_ENV}.toml in a config directory.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use std::path::Path;
use tracing::debug;

pub const BASE_FILE: &str = "backdrop.toml";

/// Add config files found in `config_dir` to the builder.
/// Precedence: backdrop.toml (base) then backdrop.{BACKDROP_ENV}.toml when the variable is set.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    config_dir: &Path,
) -> ConfigBuilder<DefaultState> {
    let base_config_path = config_dir.join(BASE_FILE);
    if base_config_path.exists() {
        debug!(config_path = %base_config_path.display(), "Loading config file");
        builder = builder.add_source(File::from(base_config_path).required(false));
    }

    if let Ok(env_name) = std::env::var("BACKDROP_ENV") {
        let env_config_path = config_dir.join(format!("backdrop.{}.toml", env_name));
        if env_config_path.exists() {
            debug!(config_path = %env_config_path.display(), "Loading environment config file");
            builder = builder.add_source(File::from(env_config_path).required(false));
        }
    }

    builder
}
