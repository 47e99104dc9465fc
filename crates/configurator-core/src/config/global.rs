//! Process-wide shared store.
//!
//! The first call to [`main_config`] or [`main_config_with`] builds the store;
//! every later call returns the same instance. Options passed after the store
//! exists are ignored.
use std::sync::{Mutex, OnceLock};

use log::{debug, warn};

use crate::config::options::ConfigOptions;
use crate::config::store::ConfigStore;
use crate::error::Result;

static MAIN_CONFIG: OnceLock<Mutex<ConfigStore>> = OnceLock::new();

/// The shared store, created with default options on first use.
pub fn main_config() -> Result<&'static Mutex<ConfigStore>> {
    main_config_with(ConfigOptions::default())
}

/// The shared store, created with `options` on first use.
pub fn main_config_with(options: ConfigOptions) -> Result<&'static Mutex<ConfigStore>> {
    if let Some(existing) = MAIN_CONFIG.get() {
        if options != ConfigOptions::default() {
            warn!("Main config already initialized, ignoring options {:?}", options);
        }
        return Ok(existing);
    }
    let store = ConfigStore::new(options)?;
    // A racing initializer may win; its instance is kept and ours dropped.
    let shared = MAIN_CONFIG.get_or_init(|| {
        debug!("Initializing main config");
        Mutex::new(store)
    });
    Ok(shared)
}
