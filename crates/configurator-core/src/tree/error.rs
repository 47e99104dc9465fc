//! # Configurator Tree Errors
//!
//! Defines [`TreeError`], raised by the writing form of the tree walk when a
//! key runs into a stored value that cannot hold children, and by removals
//! that would shift the elements of an array.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Cannot descend into {found} at segment '{segment}' of key {key}")]
    PathConflict {
        key: String,
        segment: String,
        found: &'static str,
    },

    #[error("Index {index} is out of range for array of length {len} in key {key}")]
    IndexOutOfRange { key: String, index: usize, len: usize },

    #[error("Cannot clear index {index} of array of length {len} in key {key}: only the last element can be cleared")]
    ArrayHole { key: String, index: usize, len: usize },
}
