//! # Configurator Codec Errors
//!
//! Defines [`CodecError`], covering malformed codec registrations, lookups of
//! unregistered formats, and failures raised by a codec's own parse or
//! serialize function. Codec failures carry the codec's error unchanged and
//! display its message as is; [`CodecError::codec_error`] hands it out for
//! downcasting to the codec's concrete error type.
use std::fmt;

use thiserror::Error;

/// Error type a codec function may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The two functions every codec must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFunction {
    Parse,
    Serialize,
}

impl fmt::Display for CodecFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecFunction::Parse => f.write_str("parse"),
            CodecFunction::Serialize => f.write_str("serialize"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("No codec format type or extension given")]
    MissingFormatType,

    #[error("No codec {0} function given")]
    MissingCodecFunction(CodecFunction),

    #[error("No codec registered for format '{0}'")]
    UnknownFormat(String),

    /// The codec's parse function failed. Displays the codec's own message.
    #[error("{error}")]
    Deserialization { format: String, error: BoxError },

    /// The codec's serialize function failed. Displays the codec's own message.
    #[error("{error}")]
    Serialization { format: String, error: BoxError },
}

impl CodecError {
    /// The error raised by the codec itself, for downcasting to its concrete type.
    pub fn codec_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            CodecError::Deserialization { error, .. } | CodecError::Serialization { error, .. } => {
                Some(error.as_ref())
            }
            _ => None,
        }
    }

    /// Format type of the codec that failed.
    pub fn format(&self) -> Option<&str> {
        match self {
            CodecError::Deserialization { format, .. } | CodecError::Serialization { format, .. } => {
                Some(format)
            }
            CodecError::UnknownFormat(format) => Some(format),
            _ => None,
        }
    }
}
