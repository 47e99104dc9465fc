use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Construction options for a [`ConfigStore`](super::ConfigStore).
///
/// Missing fields take their defaults when deserialized, so options can be
/// read from any supported file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    /// Splits string keys into segments.
    pub separator: String,
    /// Remember which file each loaded key came from.
    pub store_metadata: bool,
}

impl ConfigOptions {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_metadata(mut self, store_metadata: bool) -> Self {
        self.store_metadata = store_metadata;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::InvalidOptions("separator must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            store_metadata: true,
        }
    }
}
