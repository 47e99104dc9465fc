//! # Configurator Store
//!
//! [`ConfigStore`] ties the pieces of the crate together: keys are normalized
//! with the store's separator, values live in a [`ConfigTree`](crate::tree::ConfigTree),
//! files are located with [`FileLocator`](crate::storage::FileLocator) and
//! parsed or serialized by the codecs of the store's
//! [`StoreRegistry`](crate::codec::StoreRegistry).
//!
//! ```
//! use configurator_core::config::{ConfigOptions, ConfigStore};
//! use serde_json::json;
//!
//! let mut config = ConfigStore::new(ConfigOptions::default())?;
//! config.set("server/port", 8080)?;
//! config.merge("server", json!({ "host": "localhost" }))?;
//! assert_eq!(config.get("server")?, Some(json!({ "port": 8080, "host": "localhost" })));
//!
//! config.move_key("server", "http/server", false)?;
//! assert_eq!(config.get_as::<u16>(["http", "server", "port"])?, Some(8080));
//! # Ok::<(), configurator_core::Error>(())
//! ```
pub mod error;
pub mod global;
pub mod metadata;
pub mod options;
pub mod store;

pub use error::ConfigError;
pub use global::{main_config, main_config_with};
pub use metadata::MetadataMap;
pub use options::{ConfigOptions, DEFAULT_SEPARATOR};
pub use store::{ConfigStore, LoadTarget};

#[cfg(test)]
mod tests;
