//! # Configurator Errors
//!
//! [`Error`] gathers the typed errors of every subsystem so that store
//! operations can use a single [`Result`] type. `get` and `clear` on a key
//! that does not exist are not errors; they return `None` / do nothing.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::codec::error::CodecError;
use crate::config::error::ConfigError;
use crate::key::error::KeyError;
use crate::storage::error::StorageSystemError;
use crate::tree::error::TreeError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Malformed key argument
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Key runs through a value that cannot hold children
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// Codec registration, lookup, parse or serialize failure
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// File I/O or location resolution failure
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Store-level failure: missing key, missing destination, bad options
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

// Helper to create Io errors with context
impl Error {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::io(source, operation, path))
    }

    /// True for a failed read or write of the underlying file.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::StorageSystem(StorageSystemError::Io { .. }))
    }
}
