use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// File I/O collaborator used by `load` and `store`.
///
/// Implementations report failures as
/// [`StorageSystemError::Io`](crate::storage::StorageSystemError::Io) carrying
/// the underlying OS error.
#[async_trait]
pub trait StorageProvider: Send + Sync + Debug {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Create a directory and all its parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Read a file to a string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write a string to a file, replacing it
    fn write_string(&self, path: &Path, contents: &str) -> Result<()>;

    /// Read a file to a string without blocking the calling task
    async fn read_to_string_async(&self, path: &Path) -> Result<String>;

    /// Write a string to a file without blocking the calling task
    async fn write_string_async(&self, path: &Path, contents: &str) -> Result<()>;
}
