//! # Configurator Store Errors
//!
//! Defines [`ConfigError`], raised by [`ConfigStore`](super::ConfigStore)
//! operations that need a key or destination which is not there.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot save config '{key}': no path given and no file recorded for it")]
    NoDestinationPath { key: String },

    #[error("Key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("Value for key '{key}' could not be converted: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid store options: {0}")]
    InvalidOptions(String),
}
