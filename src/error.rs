//! Error types for the backdrop context store.

use crate::context::ContextKey;
use thiserror::Error;

/// Errors reported at the dispatcher boundary
#[derive(Debug, Error)]
pub enum BackdropError {
    /// No entry for the identity, or the key is absent within the entry.
    /// The two cases are deliberately not distinguished.
    #[error("failed to get variable from backdrop")]
    NotFound,

    #[error("failed to set variable to backdrop")]
    SetFailed,

    /// The store was stopped (or never started) before the call could be serviced.
    #[error("backdrop store is not running")]
    Unavailable,

    #[error("value stored under {key} has a different type")]
    TypeMismatch { key: ContextKey },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for BackdropError {
    fn from(err: config::ConfigError) -> Self {
        BackdropError::ConfigError(err.to_string())
    }
}
