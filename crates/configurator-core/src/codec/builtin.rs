use std::path::Path;

use serde_json::Value;

use crate::codec::error::BoxError;
use crate::codec::ini;
use crate::codec::registry::{CodecDescriptor, StoreRegistry};

/// Built-in configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// INI format (.ini)
    Ini,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Every format compiled into this build.
    pub const ALL: &'static [ConfigFormat] = &[
        ConfigFormat::Json,
        ConfigFormat::Ini,
        #[cfg(feature = "yaml-config")]
        ConfigFormat::Yaml,
        #[cfg(feature = "toml-config")]
        ConfigFormat::Toml,
    ];

    /// Registry key for this format
    pub fn format_type(&self) -> &'static str {
        self.extension()
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Ini => "ini",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Other extensions registered for the same codec.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => &["yml"],
            _ => &[],
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| {
                let ext = ext.to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|format| format.extension() == ext || format.aliases().contains(&ext.as_str()))
            })
    }

    /// Parse text in this format.
    pub fn parse(&self, text: &str) -> Result<Value, BoxError> {
        match self {
            ConfigFormat::Json => Ok(serde_json::from_str(text)?),
            ConfigFormat::Ini => Ok(ini::parse(text)?),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                // An empty YAML document is an empty mapping rather than null
                if text.trim().is_empty() {
                    return Ok(Value::Object(Default::default()));
                }
                Ok(serde_yaml::from_str(text)?)
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => Ok(toml::from_str(text)?),
        }
    }

    /// Serialize a value in this format.
    pub fn serialize(&self, value: &Value) -> Result<String, BoxError> {
        match self {
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            ConfigFormat::Ini => Ok(ini::stringify(value)?),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => Ok(toml::to_string_pretty(value)?),
        }
    }

    /// Registration descriptor for this format under `extension`.
    fn descriptor(self, extension: &str) -> CodecDescriptor {
        CodecDescriptor::new()
            .format_type(extension)
            .extension(format!(".{}", extension))
            .parse(move |text| self.parse(text))
            .serialize(move |value| self.serialize(value))
    }
}

/// Build the registry holding every built-in format and its aliases.
pub(crate) fn default_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::empty();
    for format in ConfigFormat::ALL {
        let extensions = std::iter::once(format.extension()).chain(format.aliases().iter().copied());
        for extension in extensions {
            // Built-in descriptors always carry a type and both functions
            if let Err(e) = registry.register(format.descriptor(extension)) {
                log::error!("Failed to register built-in codec '{}': {}", extension, e);
            }
        }
    }
    registry
}
