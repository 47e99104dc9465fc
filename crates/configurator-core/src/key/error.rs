//! # Configurator Key Errors
//!
//! Defines [`KeyError`], raised when a key argument cannot be turned into a
//! [`PathKey`](super::PathKey).
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key was neither a delimited string nor a non-empty list of segments.
    #[error("Key must be a string or an array of strings, got {found}")]
    InvalidKeyType { found: String },
}
