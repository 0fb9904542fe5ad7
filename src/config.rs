//! Configuration System
//!
//! Layered configuration for the store and its logging: built-in defaults, an optional
//! `backdrop.toml` (plus a `BACKDROP_ENV` specific overlay), then `BACKDROP__*`
//! environment variables.

use crate::error::BackdropError;
use crate::logging::LoggingConfig;
use crate::store::StoreOptions;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackdropConfig {
    /// Worker pool settings
    #[serde(default)]
    pub store: StoreOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BackdropConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), BackdropError> {
        self.logging
            .validate()
            .map_err(|e| BackdropError::ConfigError(format!("logging: {}", e)))
    }

    /// Store options with zero counts coerced to one.
    pub fn store_options(&self) -> StoreOptions {
        self.store.clone().sane_defaults()
    }
}
