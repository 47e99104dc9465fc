#![cfg(test)]

use std::fs;

use serde_json::json;

use crate::codec::ConfigFormat;
use crate::config::ConfigOptions;
use crate::error::Result;

use super::common::setup_test_environment;

/// Every built-in format reads back what it wrote.
#[test]
fn test_each_format_reads_its_own_output() -> Result<()> {
    let (temp_dir, mut config) = setup_test_environment(ConfigOptions::default());
    let value = json!({
        "name": "service",
        "enabled": true,
        "section": { "host": "localhost", "port": 8080 }
    });
    config.set("source", value.clone())?;

    for &format in ConfigFormat::ALL {
        let file = format!("out/source.{}", format.extension());
        config.store_to("source", file.as_str())?;
        assert!(temp_dir.path().join(&file).is_file(), "{file} written");

        config.load_at(["copies", format.format_type()], file.as_str())?;
    }

    for &format in ConfigFormat::ALL {
        let copy = config.get(["copies", format.format_type()])?;
        match format {
            // INI values are text unless they spell a literal
            ConfigFormat::Ini => assert_eq!(
                copy,
                Some(json!({
                    "name": "service",
                    "enabled": true,
                    "section": { "host": "localhost", "port": "8080" }
                }))
            ),
            _ => assert_eq!(copy, Some(value.clone()), "{} copy", format.format_type()),
        }
    }
    Ok(())
}

#[test]
fn test_ini_fixture_converts_to_yaml() -> Result<()> {
    let (temp_dir, mut config) = setup_test_environment(ConfigOptions::default());

    config.load("test.ini")?;
    config.store_to("test", "test-converted.yml")?;

    let yaml = fs::read_to_string(temp_dir.path().join("test-converted.yml")).expect("converted file");
    assert!(yaml.contains("user: dbuser"));
    Ok(())
}
