//! # Configurator Path Keys
//!
//! A [`PathKey`] is the normalized, ordered list of segments that addresses a
//! slot in the configuration tree. Callers hand keys over as a [`KeyArg`],
//! either a delimited string (`"server/http/port"`) or an explicit list of
//! segments (`["server", "http", "port"]`), and the store normalizes them
//! with its configured separator.
//!
//! Separators inside a segment are not escaped: `"a/b"` given as a string is
//! always two segments.
pub mod error;

use std::fmt;

use serde_json::Value;

pub use error::KeyError;

/// Normalized sequence of path segments. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    segments: Vec<String>,
}

impl PathKey {
    /// Split a delimited string on `separator`.
    ///
    /// Every substring becomes a segment, including the empty ones produced
    /// by doubled or trailing separators. Nothing is trimmed.
    pub fn parse(input: &str, separator: &str) -> Self {
        Self {
            segments: input.split(separator).map(String::from).collect(),
        }
    }

    /// Accept an already split key verbatim.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(KeyError::InvalidKeyType {
                found: "empty segment list".to_string(),
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false, keys hold at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments leading to the parent container.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The terminal segment, the slot name inside the parent container.
    pub fn last(&self) -> &str {
        // Non-empty by construction
        &self.segments[self.segments.len() - 1]
    }

    /// Join the segments back into the canonical key string.
    pub fn recombine(&self, separator: &str) -> String {
        self.segments.join(separator)
    }

    /// True when `self` equals `other` or lies underneath it.
    pub fn starts_with(&self, other: &PathKey) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.segments.join(", "))
    }
}

/// Key argument accepted by every store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyArg {
    /// Delimited key, split with the store's separator.
    Path(String),
    /// Explicit segments, used as-is.
    Segments(Vec<String>),
    /// An already normalized key.
    Key(PathKey),
}

impl KeyArg {
    /// Normalize into a [`PathKey`] using `separator`.
    pub fn normalize(self, separator: &str) -> Result<PathKey, KeyError> {
        match self {
            KeyArg::Path(path) => Ok(PathKey::parse(&path, separator)),
            KeyArg::Segments(segments) => PathKey::from_segments(segments),
            KeyArg::Key(key) => Ok(key),
        }
    }
}

impl From<&str> for KeyArg {
    fn from(path: &str) -> Self {
        KeyArg::Path(path.to_string())
    }
}

impl From<String> for KeyArg {
    fn from(path: String) -> Self {
        KeyArg::Path(path)
    }
}

impl From<&String> for KeyArg {
    fn from(path: &String) -> Self {
        KeyArg::Path(path.clone())
    }
}

impl From<Vec<String>> for KeyArg {
    fn from(segments: Vec<String>) -> Self {
        KeyArg::Segments(segments)
    }
}

impl From<Vec<&str>> for KeyArg {
    fn from(segments: Vec<&str>) -> Self {
        KeyArg::Segments(segments.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for KeyArg {
    fn from(segments: &[&str]) -> Self {
        KeyArg::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeyArg {
    fn from(segments: [&str; N]) -> Self {
        KeyArg::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<PathKey> for KeyArg {
    fn from(key: PathKey) -> Self {
        KeyArg::Key(key)
    }
}

impl From<&PathKey> for KeyArg {
    fn from(key: &PathKey) -> Self {
        KeyArg::Key(key.clone())
    }
}

/// Keys arriving as loosely typed data, e.g. from a parsed request or file.
impl TryFrom<&Value> for KeyArg {
    type Error = KeyError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(path) => Ok(KeyArg::Path(path.clone())),
            Value::Array(items) => {
                let segments = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        other => Err(KeyError::InvalidKeyType {
                            found: format!("array containing {}", value_kind(other)),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(KeyArg::Segments(segments))
            }
            other => Err(KeyError::InvalidKeyType {
                found: value_kind(other).to_string(),
            }),
        }
    }
}

/// Short type name of a JSON value, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
