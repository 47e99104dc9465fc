#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::{ConfigOptions, ConfigStore};
use crate::storage::LocalStorageProvider;

/// Path of a bundled test fixture.
pub fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("resources").join(name)
}

/// Temp directory holding copies of every fixture, plus a store rooted in it.
pub fn setup_test_environment(options: ConfigOptions) -> (TempDir, ConfigStore) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    for entry in fs::read_dir(resource("")).expect("Failed to list fixtures") {
        let entry = entry.expect("Failed to read fixture entry");
        fs::copy(entry.path(), temp_dir.path().join(entry.file_name())).expect("Failed to copy fixture");
    }
    let provider = Arc::new(LocalStorageProvider::new(temp_dir.path().to_path_buf()));
    let store = ConfigStore::with_provider(options, provider).expect("Failed to create store");
    (temp_dir, store)
}
