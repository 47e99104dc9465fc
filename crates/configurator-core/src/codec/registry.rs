use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use log::{debug, warn};
use serde_json::Value;

use crate::codec::builtin;
use crate::codec::error::{BoxError, CodecError, CodecFunction};

/// Text to value conversion provided by a codec.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync>;

/// Value to text conversion provided by a codec.
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<String, BoxError> + Send + Sync>;

/// A registered file format: its type name, file extension and the
/// parse/serialize pair that converts between file text and tree values.
#[derive(Clone)]
pub struct Codec {
    format_type: String,
    extension: String,
    parse: ParseFn,
    serialize: SerializeFn,
}

impl Codec {
    /// Registry key, always lowercase.
    pub fn format_type(&self) -> &str {
        &self.format_type
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Parse file text into a value.
    pub fn parse(&self, text: &str) -> Result<Value, CodecError> {
        (self.parse)(text).map_err(|error| CodecError::Deserialization {
            format: self.format_type.clone(),
            error,
        })
    }

    /// Serialize a value into file text.
    pub fn serialize(&self, value: &Value) -> Result<String, CodecError> {
        (self.serialize)(value).map_err(|error| CodecError::Serialization {
            format: self.format_type.clone(),
            error,
        })
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("format_type", &self.format_type)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

/// Registration request for a codec. Every field is optional here so that
/// incomplete descriptors can be rejected by [`StoreRegistry::register`].
#[derive(Clone, Default)]
pub struct CodecDescriptor {
    format_type: Option<String>,
    extension: Option<String>,
    parse: Option<ParseFn>,
    serialize: Option<SerializeFn>,
}

impl CodecDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_type(mut self, format_type: impl Into<String>) -> Self {
        self.format_type = Some(format_type.into());
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn parse<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.parse = Some(Arc::new(parse));
        self
    }

    pub fn serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(&Value) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(serialize));
        self
    }

    /// Validate into a [`Codec`].
    ///
    /// The type comes from `format_type`, else from `extension` minus its
    /// leading dot. The extension defaults to `"." + type`.
    fn build(self) -> Result<Codec, CodecError> {
        let format_type = self
            .format_type
            .or_else(|| {
                self.extension
                    .as_deref()
                    .map(|ext| ext.strip_prefix('.').unwrap_or(ext).to_string())
            })
            .filter(|format_type| !format_type.is_empty())
            .ok_or(CodecError::MissingFormatType)?
            .to_lowercase();

        let extension = match self.extension {
            Some(ext) if ext.starts_with('.') => ext,
            Some(ext) => format!(".{}", ext),
            None => format!(".{}", format_type),
        };

        let parse = self.parse.ok_or(CodecError::MissingCodecFunction(CodecFunction::Parse))?;
        let serialize = self
            .serialize
            .ok_or(CodecError::MissingCodecFunction(CodecFunction::Serialize))?;

        Ok(Codec {
            format_type,
            extension,
            parse,
            serialize,
        })
    }
}

impl fmt::Debug for CodecDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecDescriptor")
            .field("format_type", &self.format_type)
            .field("extension", &self.extension)
            .field("parse", &self.parse.is_some())
            .field("serialize", &self.serialize.is_some())
            .finish()
    }
}

/// Registry mapping a format type to its codec.
///
/// Every store gets its own copy of the process-wide default set, so
/// registrations made on one store never show up in another.
#[derive(Debug, Clone, Default)]
pub struct StoreRegistry {
    codecs: HashMap<String, Arc<Codec>>,
}

impl StoreRegistry {
    /// A registry with no codecs at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh copy of the built-in codec set.
    pub fn with_defaults() -> Self {
        static DEFAULTS: OnceLock<StoreRegistry> = OnceLock::new();
        DEFAULTS.get_or_init(builtin::default_registry).clone()
    }

    /// Register a codec, replacing any codec already registered for the same
    /// type. Nothing is registered when validation fails.
    pub fn register(&mut self, descriptor: CodecDescriptor) -> Result<(), CodecError> {
        let codec = descriptor.build()?;
        let format_type = codec.format_type.clone();
        if self.codecs.insert(format_type.clone(), Arc::new(codec)).is_some() {
            warn!("Codec for format '{}' replaced by a new registration", format_type);
        } else {
            debug!("Registered codec for format '{}'", format_type);
        }
        Ok(())
    }

    /// Remove a codec, returning it when it was registered.
    pub fn unregister(&mut self, format_type: &str) -> Option<Arc<Codec>> {
        self.codecs.remove(&format_type.to_lowercase())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, format_type: &str) -> Option<&Arc<Codec>> {
        self.codecs.get(&format_type.to_lowercase())
    }

    /// Like [`get`](Self::get), failing with [`CodecError::UnknownFormat`].
    pub fn codec(&self, format_type: &str) -> Result<Arc<Codec>, CodecError> {
        self.get(format_type)
            .cloned()
            .ok_or_else(|| CodecError::UnknownFormat(format_type.to_string()))
    }

    pub fn contains(&self, format_type: &str) -> bool {
        self.codecs.contains_key(&format_type.to_lowercase())
    }

    /// Registered format types, sorted.
    pub fn format_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
