//! # Configurator Config Tree
//!
//! The nested mapping that holds every stored value. Internal nodes are JSON
//! objects (arrays are addressable by index too), leaves are arbitrary JSON
//! values including `null`.
//!
//! All operations take a normalized [`PathKey`]; separator handling lives in
//! the [`ConfigStore`](crate::config::ConfigStore) that owns the tree.
pub mod error;
pub mod merge;
pub(crate) mod navigator;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::key::PathKey;

pub use error::TreeError;
pub use merge::deep_merge;

/// Default key used by [`ConfigTree::merge`] to keep a scalar that a merge
/// would otherwise overwrite.
pub const DEFAULT_REPLACE_KEY: &str = "_";

/// In-memory configuration tree. The root is always a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Value,
}

impl ConfigTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Build a tree from an existing mapping.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            root: Value::Object(map),
        }
    }

    /// The whole tree as a JSON object.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.as_object().is_none_or(Map::is_empty)
    }

    /// Borrow the value stored at `key`, `None` when absent.
    pub fn get(&self, key: &PathKey) -> Option<&Value> {
        navigator::locate_parent(&self.root, key).and_then(|parent| navigator::child(parent, key.last()))
    }

    /// Mutably borrow the value stored at `key`.
    pub fn get_mut(&mut self, key: &PathKey) -> Option<&mut Value> {
        match navigator::locate_existing_parent_mut(&mut self.root, key)? {
            Value::Object(map) => map.get_mut(key.last()),
            Value::Array(items) => navigator::parse_index(key.last()).and_then(|index| items.get_mut(index)),
            _ => None,
        }
    }

    /// Deserialize the value at `key` into `T`.
    pub fn get_as<T: for<'de> Deserialize<'de>>(&self, key: &PathKey) -> Option<T> {
        self.get(key).and_then(|value| T::deserialize(value).ok())
    }

    pub fn contains(&self, key: &PathKey) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` at `key`, creating intermediate mappings as needed.
    pub fn insert(&mut self, key: &PathKey, value: Value) -> Result<&mut Value, TreeError> {
        debug!("Setting config key {}", key);
        let parent = navigator::locate_or_create_parent(&mut self.root, key)?;
        navigator::put(parent, key, value)
    }

    /// Remove the slot at `key`. Missing keys are a no-op.
    ///
    /// Array elements keep their indices, so only the last element of an
    /// array can be removed; any other index fails with
    /// [`TreeError::ArrayHole`].
    pub fn remove(&mut self, key: &PathKey) -> Result<Option<Value>, TreeError> {
        let Some(parent) = navigator::locate_existing_parent_mut(&mut self.root, key) else {
            return Ok(None);
        };
        let removed = navigator::take(parent, key)?;
        if removed.is_some() {
            debug!("Cleared config key {}", key);
        }
        Ok(removed)
    }

    /// Fail with the error [`insert`](Self::insert) would raise for `key`,
    /// without modifying the tree.
    pub fn check_writable(&self, key: &PathKey) -> Result<(), TreeError> {
        navigator::check_writable(&self.root, key)
    }

    /// Deep-merge `value` into the slot at `key`.
    ///
    /// A non-null scalar or array already stored there is kept under
    /// `replace_key` inside the merged mapping. A non-mapping `value` is
    /// likewise stored under `replace_key`. Returns the merged mapping.
    pub fn merge(&mut self, key: &PathKey, value: Value, replace_key: &str) -> Result<&mut Value, TreeError> {
        let base = match self.get_mut(key).map(Value::take) {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(Value::Object(map)) => Value::Object(map),
            Some(scalar) => wrap(replace_key, scalar),
        };
        let incoming = match value {
            Value::Object(map) => Value::Object(map),
            other => wrap(replace_key, other),
        };
        let mut merged = base;
        deep_merge(&mut merged, incoming);
        debug!("Merged into config key {}", key);
        self.insert(key, merged)
    }

    /// Drop every stored value.
    pub fn reset(&mut self) {
        self.root = Value::Object(Map::new());
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap(replace_key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(replace_key.to_string(), value);
    Value::Object(map)
}

#[cfg(test)]
mod tests;
