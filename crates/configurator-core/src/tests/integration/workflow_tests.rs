#![cfg(test)]

use std::fs;

use serde_json::json;

use crate::config::{ConfigOptions, LoadTarget};
use crate::error::Result;
use crate::storage::FileDescriptor;

use super::common::setup_test_environment;

#[test]
fn test_load_edit_store_cycle() -> Result<()> {
    let (temp_dir, mut config) = setup_test_environment(ConfigOptions::default());

    config.load("test.ini")?;
    config.load(LoadTarget::at("profile", FileDescriptor::new("test.yaml")))?;

    config.merge("profile", json!({ "employed": false, "team": "platform" }))?;
    config.move_key("test/section/database", "profile/database", false)?;

    assert_eq!(config.get("profile/database/user")?, Some(json!("dbuser")));
    assert_eq!(config.get("test/section")?, Some(json!({})));

    config.store("profile")?;
    let yaml = fs::read_to_string(temp_dir.path().join("test.yaml")).expect("stored file");
    assert!(yaml.contains("team: platform"));
    assert!(yaml.contains("employed: false"));
    Ok(())
}

#[test]
fn test_dotted_separator_workflow() -> Result<()> {
    let (_temp_dir, mut config) = setup_test_environment(ConfigOptions::default().with_separator("."));

    config.load_at("app.db", "test.ini")?;
    assert_eq!(config.get("app.db.section.database.user")?, Some(json!("dbuser")));
    assert_eq!(
        config.metadata("app.db")?.map(|origin| origin.full_path().to_path_buf()),
        Some(std::path::PathBuf::from("./test.ini"))
    );
    Ok(())
}
