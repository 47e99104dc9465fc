#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

use crate::codec::{CodecDescriptor, CodecError};
use crate::config::{ConfigError, ConfigOptions, ConfigStore};
use crate::error::{Error, Result};
use crate::storage::{FileDescriptor, LocalStorageProvider};

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("resources").join(name)
}

/// Temp directory with the fixtures copied under `conf/`, and a store rooted there.
fn setup(options: ConfigOptions) -> (TempDir, ConfigStore) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let conf = temp_dir.path().join("conf");
    fs::create_dir_all(&conf).expect("Failed to create conf directory");
    for name in ["test.ini", "test.yaml"] {
        fs::copy(resource(name), conf.join(name)).expect("Failed to copy fixture");
    }
    let provider = Arc::new(LocalStorageProvider::new(temp_dir.path().to_path_buf()));
    let config = ConfigStore::with_provider(options, provider).expect("Failed to create store");
    (temp_dir, config)
}

fn csv_descriptor() -> CodecDescriptor {
    CodecDescriptor::new()
        .format_type("csv")
        .parse(|text| {
            let rows: Vec<Value> = text
                .lines()
                .map(|line| Value::from(line.split(',').collect::<Vec<_>>()))
                .collect();
            Ok(Value::Array(rows))
        })
        .serialize(|value| {
            let rows = value.as_array().ok_or("csv needs an array of rows")?;
            let mut out = String::new();
            for row in rows {
                let cells: Vec<&str> = row
                    .as_array()
                    .ok_or("csv rows must be arrays")?
                    .iter()
                    .map(|cell| cell.as_str().unwrap_or_default())
                    .collect();
                out.push_str(&cells.join(","));
                out.push('\n');
            }
            Ok(out)
        })
}

#[test]
fn test_load_uses_base_name_as_key() -> Result<()> {
    let (_temp_dir, mut config) = setup(ConfigOptions::default());

    let loaded = config.load("conf/test.ini")?.clone();
    assert_eq!(
        loaded,
        json!({ "section": { "database": { "user": "dbuser", "database": "use_another_database" } } })
    );
    assert_eq!(config.get("test/section/database/user")?, Some(json!("dbuser")));

    let origin = config.metadata("test")?.expect("origin recorded");
    assert_eq!(origin.directory(), "conf");
    assert_eq!(origin.base_name(), "test");
    assert_eq!(origin.extension(), ".ini");
    assert_eq!(origin.format_type(), "ini");
    Ok(())
}

#[test]
fn test_load_at_key_with_descriptor() -> Result<()> {
    let (_temp_dir, mut config) = setup(ConfigOptions::default());

    config.load(("developer", FileDescriptor::new("test.yaml").dir("conf/")))?;
    assert_eq!(config.get("developer/job")?, Some(json!("Developer")));
    assert_eq!(config.get("developer/employed")?, Some(json!(true)));
    assert_eq!(config.get("developer/skills/0")?, Some(json!("rust")));

    config.load_at("db", "conf/test.ini")?;
    assert_eq!(config.get("db/section/database/database")?, Some(json!("use_another_database")));
    Ok(())
}

#[test]
fn test_store_back_to_origin() -> Result<()> {
    let (temp_dir, mut config) = setup(ConfigOptions::default());

    config.load("conf/test.ini")?;
    config.set("test/section/database/user", "admin")?;
    config.store("test")?;

    let written = fs::read_to_string(temp_dir.path().join("conf/test.ini")).expect("stored file");
    assert!(written.contains("[section.database]"));
    assert!(written.contains("user=admin"));

    config.reset();
    config.load("conf/test.ini")?;
    assert_eq!(config.get("test/section/database/user")?, Some(json!("admin")));
    Ok(())
}

#[test]
fn test_store_to_converts_format() -> Result<()> {
    let (temp_dir, mut config) = setup(ConfigOptions::default());

    config.load("conf/test.yaml")?;
    config.store_to("test", "out/developer.json")?;

    let written = fs::read_to_string(temp_dir.path().join("out/developer.json")).expect("stored file");
    let parsed: Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(parsed["job"], json!("Developer"));

    // Storing elsewhere does not move the recorded origin
    assert_eq!(config.metadata("test")?.map(|origin| origin.format_type()), Some("yaml"));
    Ok(())
}

#[test]
fn test_store_errors_in_order() -> Result<()> {
    let (_temp_dir, mut config) = setup(ConfigOptions::default());

    // No destination wins over a missing value
    let err = config.store("missing").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::NoDestinationPath { ref key }) if key == "missing"));

    let err = config.store_to("missing", "out/missing.json").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::KeyNotFound { .. })));

    config.set("present", 1)?;
    let err = config.store_to("present", "out/present.xyz").unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::UnknownFormat(ref t)) if t == "xyz"));
    Ok(())
}

#[test]
fn test_load_failures_insert_nothing() -> Result<()> {
    let (temp_dir, mut config) = setup(ConfigOptions::default());

    let err = config.load("conf/absent.json").unwrap_err();
    assert!(err.is_io());

    fs::write(temp_dir.path().join("conf/broken.json"), "{ not json").expect("write fixture");
    let err = config.load("conf/broken.json").unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::Deserialization { .. })));

    fs::write(temp_dir.path().join("conf/data.unknown"), "whatever").expect("write fixture");
    let err = config.load("conf/data.unknown").unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::UnknownFormat(_))));

    assert!(config.tree().is_empty());
    assert!(config.metadata("absent")?.is_none());
    Ok(())
}

#[test]
fn test_without_metadata() -> Result<()> {
    let (_temp_dir, mut config) = setup(ConfigOptions::default().with_metadata(false));

    config.load("conf/test.ini")?;
    assert!(config.contains("test/section")?);
    assert!(config.metadata("test")?.is_none());

    let err = config.store("test").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::NoDestinationPath { .. })));
    Ok(())
}

#[test]
fn test_metadata_follows_move_and_clear() -> Result<()> {
    let (_temp_dir, mut config) = setup(ConfigOptions::default());

    config.load("conf/test.ini")?;
    config.move_key("test", "settings/ini", false)?;
    assert!(config.metadata("test")?.is_none());
    assert_eq!(config.metadata("settings/ini")?.map(|origin| origin.base_name()), Some("test"));

    // Still writable back to its file under the new key
    config.store("settings/ini")?;

    config.clear("settings")?;
    assert!(config.metadata("settings/ini")?.is_none());
    Ok(())
}

#[test]
fn test_add_store_custom_format() -> Result<()> {
    let (temp_dir, mut config) = setup(ConfigOptions::default());
    config.add_store(csv_descriptor())?;
    fs::write(temp_dir.path().join("conf/people.csv"), "ada,lovelace\nalan,turing\n").expect("write fixture");

    config.load(("people", FileDescriptor::new("people.csv").dir("conf/")))?;
    assert_eq!(config.get("people/1/0")?, Some(json!("alan")));

    config.set("people/0/1", "byron")?;
    config.store("people")?;
    let written = fs::read_to_string(temp_dir.path().join("conf/people.csv")).expect("stored file");
    assert_eq!(written, "ada,byron\nalan,turing\n");

    // Registration is per store
    let other = ConfigStore::new(ConfigOptions::default())?;
    assert!(!other.registry().contains("csv"));
    Ok(())
}

#[test]
fn test_add_store_with_extensionless_descriptor() -> Result<()> {
    let (temp_dir, mut config) = setup(ConfigOptions::default());
    config.add_store(csv_descriptor())?;
    fs::write(temp_dir.path().join("conf/x"), "a,b\n").expect("write fixture");

    config.load(("rows", FileDescriptor::new("x").dir("conf/").format_type("csv")))?;
    assert_eq!(config.get("rows")?, Some(json!([["a", "b"]])));
    assert_eq!(config.metadata("rows")?.map(|origin| origin.extension()), Some(""));
    Ok(())
}

#[test]
fn test_forced_format_type() -> Result<()> {
    let (temp_dir, mut config) = setup(ConfigOptions::default());
    fs::write(temp_dir.path().join("conf/settings.conf"), "[main]\nmode=fast\n").expect("write fixture");

    config.load(FileDescriptor::new("conf/settings.conf").format_type("ini"))?;
    assert_eq!(config.get("settings/main/mode")?, Some(json!("fast")));
    Ok(())
}

#[tokio::test]
async fn test_async_load_and_store() -> Result<()> {
    let (temp_dir, mut config) = setup(ConfigOptions::default());

    let loaded = config.load_async("conf/test.yaml").await?;
    assert_eq!(loaded["job"], json!("Developer"));
    assert_eq!(config.get("test/employed")?, Some(json!(true)));

    config.set("test/job", "Lead")?;
    config.store_async("test").await?;
    config.store_to_async("test", "out/test.toml").await?;

    let yaml = fs::read_to_string(temp_dir.path().join("conf/test.yaml")).expect("stored file");
    assert!(yaml.contains("job: Lead"));
    let toml = fs::read_to_string(temp_dir.path().join("out/test.toml")).expect("stored file");
    assert!(toml.contains("job = \"Lead\""));
    Ok(())
}

#[tokio::test]
async fn test_async_load_missing_file_inserts_nothing() -> Result<()> {
    let (_temp_dir, mut config) = setup(ConfigOptions::default());

    let err = config.load_async("conf/nothing.json").await.unwrap_err();
    assert!(err.is_io());
    assert_eq!(config.get("nothing")?, None);
    assert!(config.metadata("nothing")?.is_none());
    Ok(())
}
