//! # configurator-core
//!
//! An in-memory, hierarchical configuration store. Values are addressed by
//! path keys (`"server/http/port"` or `["server", "http", "port"]`), can be
//! merged, moved and cleared, and whole subtrees can be loaded from or stored
//! to JSON, INI, YAML and TOML files. Further formats are registered at
//! runtime per store.
//!
//! The pieces, bottom-up:
//! - [`key`]: normalizing key arguments into a [`PathKey`]
//! - [`tree`]: the nested value tree and its navigation
//! - [`codec`]: the format registry and built-in codecs
//! - [`storage`]: file location resolution and file I/O
//! - [`config`]: the [`ConfigStore`] orchestrator and the shared main instance
pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod storage;
pub mod tree;

pub use codec::{CodecDescriptor, ConfigFormat, StoreRegistry};
pub use config::{ConfigOptions, ConfigStore, LoadTarget, main_config, main_config_with};
pub use error::{Error, Result};
pub use key::{KeyArg, PathKey};
pub use storage::{FileDescriptor, FileLocator, FileSpec, LocalStorageProvider, StorageProvider};
pub use tree::ConfigTree;

#[cfg(test)]
mod tests;
