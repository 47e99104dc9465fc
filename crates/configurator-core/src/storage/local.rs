use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::provider::StorageProvider;

/// Local filesystem storage provider
#[derive(Clone)]
pub struct LocalStorageProvider {
    base_path: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider with the given base path
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Provider rooted at the current working directory.
    pub fn current_dir() -> Self {
        Self::new(PathBuf::from("."))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a relative path against the base path. Absolute paths are kept.
    fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.base_path.join(path)
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve_path(path).exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve_path(path).is_file()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve_path(path);
        fs::create_dir_all(&full_path).map_err(|e| Error::io(e, "create_dir_all", full_path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve_path(path);
        fs::read_to_string(&full_path).map_err(|e| Error::io(e, "read_to_string", full_path))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        let full_path = self.resolve_path(path);

        // Ensure parent directory exists
        let parent = match full_path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => {
                return Err(Error::io(
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent directory"),
                    "write_string",
                    full_path,
                ));
            }
        };
        if !parent.is_dir() {
            fs::create_dir_all(parent).map_err(|e| Error::io(e, "create_dir_all", parent.to_path_buf()))?;
        }

        // Create a named temporary file in the same directory as the target file
        let mut temp_file =
            NamedTempFile::new_in(parent).map_err(|e| Error::io(e, "create_temp_file", parent.to_path_buf()))?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| Error::io(e, "write_to_temp_file", temp_file.path().to_path_buf()))?;

        // Persist the temporary file, atomically replacing the target file
        temp_file
            .persist(&full_path)
            .map_err(|e| Error::io(e.error, "persist_temp_file", full_path.clone()))?;

        Ok(())
    }

    async fn read_to_string_async(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve_path(path);
        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| Error::io(e, "read_to_string_async", full_path))
    }

    async fn write_string_async(&self, path: &Path, contents: &str) -> Result<()> {
        let provider = self.clone();
        let target = path.to_path_buf();
        let contents = contents.to_string();

        // The atomic write is blocking file-system work
        tokio::task::spawn_blocking(move || provider.write_string(&target, &contents))
            .await
            .map_err(|e| StorageSystemError::AsyncTaskFailed {
                operation: "write_string_async".to_string(),
                path: self.resolve_path(path),
                message: e.to_string(),
            })?
    }
}

impl fmt::Debug for LocalStorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorageProvider")
            .field("base_path", &self.base_path)
            .finish()
    }
}
