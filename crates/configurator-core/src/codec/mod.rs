//! # Configurator Codecs
//!
//! The [`StoreRegistry`] maps a format type (`"json"`, `"ini"`, ...) to a
//! [`Codec`]: a parse/serialize pair plus the file extension it is stored
//! under. Formats are ordinary values, so new ones can be registered at
//! runtime through a [`CodecDescriptor`] without touching the core:
//!
//! ```
//! use configurator_core::codec::{CodecDescriptor, StoreRegistry};
//! use serde_json::Value;
//!
//! let mut registry = StoreRegistry::with_defaults();
//! registry
//!     .register(
//!         CodecDescriptor::new()
//!             .format_type("lines")
//!             .parse(|text| Ok(Value::from(text.lines().collect::<Vec<_>>())))
//!             .serialize(|value| Ok(value.to_string())),
//!     )
//!     .unwrap();
//! assert!(registry.contains("lines"));
//! ```
//!
//! Built-in formats are listed by [`ConfigFormat`]; YAML and TOML are behind
//! the `yaml-config` and `toml-config` features.
pub mod builtin;
pub mod error;
pub mod ini;
pub mod registry;

pub use builtin::ConfigFormat;
pub use error::{BoxError, CodecError, CodecFunction};
pub use registry::{Codec, CodecDescriptor, ParseFn, SerializeFn, StoreRegistry};
