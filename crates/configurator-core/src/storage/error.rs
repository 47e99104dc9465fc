//! # Configurator Storage System Errors
//!
//! Defines [`StorageSystemError`], covering failures of the file I/O
//! collaborator and location arguments that cannot be resolved to a file.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Location must be a path string or a file descriptor with a 'path', got {found}")]
    InvalidPathSpec { found: String },

    #[error("Background storage task for '{operation}' on path '{path}' failed: {message}")]
    AsyncTaskFailed {
        operation: String,
        path: PathBuf,
        message: String,
    },
}

// Helper for creating Io errors, ensuring path is always included.
impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
