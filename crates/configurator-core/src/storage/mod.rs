//! # Configurator Storage
//!
//! File-system side of `load` and `store`: the [`StorageProvider`] trait
//! with its local implementation, and [`FileLocator`] resolution of the
//! location arguments callers pass in.
pub mod error;
pub mod local;
pub mod locator;
pub mod provider;

/// Re-export key types
pub use error::StorageSystemError;
pub use local::LocalStorageProvider;
pub use locator::{FileDescriptor, FileLocator, FileSpec};
pub use provider::StorageProvider;
