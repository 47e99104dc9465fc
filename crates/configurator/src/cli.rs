//! Command-line surface: argument definitions and the command handlers.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use configurator_core::config::{ConfigOptions, ConfigStore, DEFAULT_SEPARATOR};
use configurator_core::error::Result;
use configurator_core::key::PathKey;
use configurator_core::storage::{LocalStorageProvider, StorageProvider};
use log::{debug, info};
use serde_json::Value;

/// Key every command loads its file under.
const DOCUMENT_KEY: &str = "document";

/// Configurator: read, edit and convert configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Separator splitting keys into segments
    #[arg(long, short = 's', env = "CONFIGURATOR_SEPARATOR", default_value = DEFAULT_SEPARATOR, global = true)]
    pub separator: String,

    /// Directory relative file paths are resolved against
    #[arg(long, env = "CONFIGURATOR_BASE_DIR", global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value at a key (the whole file when no key is given) as JSON
    Get {
        /// Configuration file to read
        file: String,
        /// Key inside the file
        key: Option<String>,
    },
    /// Set a value and write the file back; the file is created if missing
    Set {
        /// Configuration file to edit
        file: String,
        /// Key inside the file
        key: String,
        /// New value, parsed as JSON when possible and kept as text otherwise
        value: String,
    },
    /// Read a file in one format and write it in another
    Convert {
        /// Source file
        input: String,
        /// Destination file; its extension picks the output format
        output: String,
    },
}

/// What a command wants the process to do once it finished.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    KeyNotFound(String),
}

impl CliArgs {
    fn store(&self) -> Result<ConfigStore> {
        let options = ConfigOptions::default().with_separator(self.separator.clone());
        let provider = match &self.base_dir {
            Some(dir) => LocalStorageProvider::new(dir.clone()),
            None => LocalStorageProvider::current_dir(),
        };
        ConfigStore::with_provider(options, Arc::new(provider))
    }

    /// Key of `key` inside the loaded document.
    fn document_key(&self, key: Option<&str>) -> Vec<String> {
        let mut segments = vec![DOCUMENT_KEY.to_string()];
        if let Some(key) = key {
            segments.extend(PathKey::parse(key, &self.separator).segments().iter().cloned());
        }
        segments
    }
}

/// Run the parsed command.
pub async fn run(args: &CliArgs) -> Result<Outcome> {
    let mut config = args.store()?;
    debug!("Running {:?}", args.command);

    match &args.command {
        Commands::Get { file, key } => {
            config.load_async((DOCUMENT_KEY, file.as_str())).await?;
            match config.get_ref(args.document_key(key.as_deref()))? {
                Some(value) => {
                    println!("{}", render(value));
                    Ok(Outcome::Done)
                }
                None => Ok(Outcome::KeyNotFound(key.clone().unwrap_or_default())),
            }
        }
        Commands::Set { file, key, value } => {
            if config.provider().exists(Path::new(file)) {
                config.load_async((DOCUMENT_KEY, file.as_str())).await?;
            } else {
                info!("{} does not exist yet, starting from an empty document", file);
            }
            config.set(args.document_key(Some(key)), parse_value(value))?;
            config.store_to_async(DOCUMENT_KEY, file.as_str()).await?;
            info!("Updated '{}' in {}", key, file);
            Ok(Outcome::Done)
        }
        Commands::Convert { input, output } => {
            config.load_async((DOCUMENT_KEY, input.as_str())).await?;
            config.store_to_async(DOCUMENT_KEY, output.as_str()).await?;
            info!("Converted {} to {}", input, output);
            Ok(Outcome::Done)
        }
    }
}

/// JSON when `raw` parses as JSON, otherwise the raw text.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
