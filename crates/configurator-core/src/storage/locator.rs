//! Resolution of location arguments into a [`FileLocator`].
//!
//! Path handling follows POSIX `dirname`/`basename` rules on the raw string
//! rather than [`std::path::Path`], so that the directory and base name keep
//! the exact spelling the caller gave (`"./conf/app.ini"` resolves to the
//! directory `"./conf"`, a bare `"app.ini"` to `"."`).
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::value_kind;
use crate::storage::error::StorageSystemError;

/// Where a configuration file lives and which codec reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocator {
    directory: String,
    base_name: String,
    extension: String,
    format_type: String,
    full_path: String,
}

impl FileLocator {
    /// Resolve a location argument.
    ///
    /// For a plain path the directory, base name and extension are split out
    /// of the string and the format type is the lowercased extension without
    /// its dot. A [`FileDescriptor`] prefixes the directory with `dir` and may
    /// force the format type.
    pub fn resolve(spec: &FileSpec) -> Self {
        let (path, dir_prefix, forced_type) = match spec {
            FileSpec::Path(path) => (path.as_str(), "", None),
            FileSpec::Descriptor(descriptor) => (
                descriptor.path.as_str(),
                descriptor.dir.as_deref().unwrap_or(""),
                descriptor.format_type.as_deref(),
            ),
        };

        let extension = extname(path).to_string();
        let base_name = basename(path, &extension).to_string();
        let directory = format!("{}{}", dir_prefix, dirname(path));
        let format_type = forced_type
            .unwrap_or_else(|| extension.strip_prefix('.').unwrap_or(&extension))
            .to_lowercase();
        let full_path = format!("{}{}{}{}", directory, MAIN_SEPARATOR, base_name, extension);

        Self {
            directory,
            base_name,
            extension,
            format_type,
            full_path,
        }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// File name without its extension.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Extension including its dot, empty when the file has none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Registry key of the codec for this file.
    pub fn format_type(&self) -> &str {
        &self.format_type
    }

    /// `directory + separator + base name + extension`.
    pub fn full_path(&self) -> &Path {
        Path::new(&self.full_path)
    }
}

/// Structured location: a path, an optional directory prefix and an optional
/// format type overriding the one implied by the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub path: String,
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default, rename = "type")]
    pub format_type: Option<String>,
}

impl FileDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dir: None,
            format_type: None,
        }
    }

    /// Directory prefix, prepended verbatim (include a trailing separator).
    pub fn dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn format_type(mut self, format_type: impl Into<String>) -> Self {
        self.format_type = Some(format_type.into());
        self
    }
}

/// Location argument accepted by `load` and `store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSpec {
    Path(String),
    Descriptor(FileDescriptor),
}

impl From<&str> for FileSpec {
    fn from(path: &str) -> Self {
        FileSpec::Path(path.to_string())
    }
}

impl From<String> for FileSpec {
    fn from(path: String) -> Self {
        FileSpec::Path(path)
    }
}

impl From<&String> for FileSpec {
    fn from(path: &String) -> Self {
        FileSpec::Path(path.clone())
    }
}

impl From<&Path> for FileSpec {
    fn from(path: &Path) -> Self {
        FileSpec::Path(path.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for FileSpec {
    fn from(path: PathBuf) -> Self {
        FileSpec::from(path.as_path())
    }
}

impl From<&PathBuf> for FileSpec {
    fn from(path: &PathBuf) -> Self {
        FileSpec::from(path.as_path())
    }
}

impl From<FileDescriptor> for FileSpec {
    fn from(descriptor: FileDescriptor) -> Self {
        FileSpec::Descriptor(descriptor)
    }
}

/// Locations arriving as loosely typed data: a string path or an object with
/// `path` and optional `dir`/`type` strings.
impl TryFrom<&Value> for FileSpec {
    type Error = StorageSystemError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(path) => Ok(FileSpec::Path(path.clone())),
            Value::Object(_) => serde_json::from_value::<FileDescriptor>(value.clone())
                .map(FileSpec::Descriptor)
                .map_err(|e| StorageSystemError::InvalidPathSpec {
                    found: format!("object ({})", e),
                }),
            other => Err(StorageSystemError::InvalidPathSpec {
                found: value_kind(other).to_string(),
            }),
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == MAIN_SEPARATOR
}

/// Everything before the last path component, `"."` if there is none.
pub(crate) fn dirname(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        // Only separators: the root
        return &path[..1];
    }
    match trimmed.rfind(is_separator) {
        None => ".",
        Some(index) => {
            let dir = trimmed[..index].trim_end_matches(is_separator);
            if dir.is_empty() { &trimmed[..1] } else { dir }
        }
    }
}

/// Last path component, with `extension` removed when it is a strict suffix.
pub(crate) fn basename<'a>(path: &'a str, extension: &str) -> &'a str {
    let trimmed = path.trim_end_matches(is_separator);
    let base = match trimmed.rfind(is_separator) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    };
    match base.strip_suffix(extension) {
        Some(stem) if !extension.is_empty() && !stem.is_empty() => stem,
        _ => base,
    }
}

/// Extension of the last component including its dot. Dotfiles have none.
pub(crate) fn extname(path: &str) -> &str {
    let base = basename(path, "");
    match base.rfind('.') {
        Some(0) | None => "",
        Some(index) => &base[index..],
    }
}
