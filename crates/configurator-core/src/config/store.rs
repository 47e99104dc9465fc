use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{Codec, CodecDescriptor, StoreRegistry};
use crate::config::error::ConfigError;
use crate::config::metadata::MetadataMap;
use crate::config::options::ConfigOptions;
use crate::error::Result;
use crate::key::{KeyArg, PathKey};
use crate::storage::{FileLocator, FileSpec, LocalStorageProvider, StorageProvider};
use crate::tree::{ConfigTree, DEFAULT_REPLACE_KEY};

/// What `load` reads and where the parsed value goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    /// Insert under the file's base name, split with the store separator.
    Location(FileSpec),
    /// Insert under an explicit key.
    At { key: KeyArg, location: FileSpec },
}

impl LoadTarget {
    pub fn at(key: impl Into<KeyArg>, location: impl Into<FileSpec>) -> Self {
        LoadTarget::At {
            key: key.into(),
            location: location.into(),
        }
    }
}

impl From<FileSpec> for LoadTarget {
    fn from(location: FileSpec) -> Self {
        LoadTarget::Location(location)
    }
}

impl From<&str> for LoadTarget {
    fn from(path: &str) -> Self {
        LoadTarget::Location(path.into())
    }
}

impl From<String> for LoadTarget {
    fn from(path: String) -> Self {
        LoadTarget::Location(path.into())
    }
}

impl From<&std::path::Path> for LoadTarget {
    fn from(path: &std::path::Path) -> Self {
        LoadTarget::Location(path.into())
    }
}

impl From<std::path::PathBuf> for LoadTarget {
    fn from(path: std::path::PathBuf) -> Self {
        LoadTarget::Location(path.into())
    }
}

impl From<crate::storage::FileDescriptor> for LoadTarget {
    fn from(descriptor: crate::storage::FileDescriptor) -> Self {
        LoadTarget::Location(descriptor.into())
    }
}

impl<K: Into<KeyArg>, F: Into<FileSpec>> From<(K, F)> for LoadTarget {
    fn from((key, location): (K, F)) -> Self {
        LoadTarget::at(key, location)
    }
}

/// Hierarchical configuration store.
///
/// Values live in a [`ConfigTree`] addressed by path keys. Subtrees can be
/// loaded from and stored to files through the codecs of the store's own
/// [`StoreRegistry`]; when metadata is enabled the store remembers which file
/// each loaded key came from, so it can be written back without naming the
/// file again.
///
/// Reads hand out owned copies ([`get`](Self::get)) or borrows
/// ([`get_ref`](Self::get_ref)); nothing returned can alias the tree once the
/// borrow ends. Mutation needs `&mut self`, so callers sharing a store across
/// threads wrap it in a lock (see [`crate::config::global`]).
#[derive(Debug)]
pub struct ConfigStore {
    options: ConfigOptions,
    tree: ConfigTree,
    metadata: Option<MetadataMap>,
    registry: StoreRegistry,
    provider: Arc<dyn StorageProvider>,
}

impl ConfigStore {
    /// Create a store reading and writing files relative to the current
    /// directory.
    pub fn new(options: ConfigOptions) -> Result<Self> {
        Self::with_provider(options, Arc::new(LocalStorageProvider::current_dir()))
    }

    /// Create a store with a custom file I/O provider.
    pub fn with_provider(options: ConfigOptions, provider: Arc<dyn StorageProvider>) -> Result<Self> {
        options.validate()?;
        let metadata = options
            .store_metadata
            .then(|| MetadataMap::new(options.separator.clone()));
        debug!(
            "Creating config store (separator '{}', metadata {}, provider '{}')",
            options.separator,
            options.store_metadata,
            provider.name()
        );
        Ok(Self {
            options,
            tree: ConfigTree::new(),
            metadata,
            registry: StoreRegistry::with_defaults(),
            provider,
        })
    }

    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StoreRegistry {
        &mut self.registry
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Register a codec on this store only.
    pub fn add_store(&mut self, descriptor: CodecDescriptor) -> Result<()> {
        Ok(self.registry.register(descriptor)?)
    }

    /// Normalize a key argument with this store's separator.
    pub fn key(&self, key: impl Into<KeyArg>) -> Result<PathKey> {
        Ok(key.into().normalize(&self.options.separator)?)
    }

    /// Owned copy of the value at `key`, `None` when absent.
    pub fn get(&self, key: impl Into<KeyArg>) -> Result<Option<Value>> {
        Ok(self.get_ref(key)?.cloned())
    }

    /// Borrow the value at `key`.
    pub fn get_ref(&self, key: impl Into<KeyArg>) -> Result<Option<&Value>> {
        let key = self.key(key)?;
        Ok(self.tree.get(&key))
    }

    /// Deserialize the value at `key`. `None` when absent or of another shape.
    pub fn get_as<T: for<'de> Deserialize<'de>>(&self, key: impl Into<KeyArg>) -> Result<Option<T>> {
        let key = self.key(key)?;
        Ok(self.tree.get_as(&key))
    }

    pub fn contains(&self, key: impl Into<KeyArg>) -> Result<bool> {
        let key = self.key(key)?;
        Ok(self.tree.contains(&key))
    }

    /// Store `value` at `key`, creating intermediate mappings. Returns the
    /// stored value.
    pub fn set(&mut self, key: impl Into<KeyArg>, value: impl Into<Value>) -> Result<&Value> {
        let key = self.key(key)?;
        Ok(self.tree.insert(&key, value.into())?)
    }

    /// Serialize `value` to a tree value and store it at `key`.
    pub fn set_serialized<T: Serialize>(&mut self, key: impl Into<KeyArg>, value: &T) -> Result<&Value> {
        let key = self.key(key)?;
        let value = serde_json::to_value(value).map_err(|source| ConfigError::InvalidValue {
            key: self.canonical(&key),
            source,
        })?;
        Ok(self.tree.insert(&key, value)?)
    }

    /// Remove the value at `key`, along with any file origin recorded for it
    /// or for keys underneath it. Missing keys are a no-op.
    ///
    /// Only the last element of an array can be cleared; clearing any other
    /// index fails with [`TreeError::ArrayHole`](crate::tree::TreeError::ArrayHole)
    /// and changes nothing.
    pub fn clear(&mut self, key: impl Into<KeyArg>) -> Result<()> {
        let key = self.key(key)?;
        self.tree.remove(&key)?;
        if let Some(metadata) = self.metadata.as_mut() {
            let purged = metadata.purge(&key);
            if purged > 0 {
                debug!("Dropped {} file origin(s) recorded under {}", purged, key);
            }
        }
        Ok(())
    }

    /// Deep-merge `value` into `key`, keeping a scalar already stored there
    /// under `"_"`.
    pub fn merge(&mut self, key: impl Into<KeyArg>, value: impl Into<Value>) -> Result<&Value> {
        self.merge_with(key, value, DEFAULT_REPLACE_KEY)
    }

    /// [`merge`](Self::merge) with a custom key for the displaced scalar.
    pub fn merge_with(&mut self, key: impl Into<KeyArg>, value: impl Into<Value>, replace_key: &str) -> Result<&Value> {
        let key = self.key(key)?;
        Ok(self.tree.merge(&key, value.into(), replace_key)?)
    }

    /// Move the value at `from` to `to`, merging into `to` when `merge` is
    /// set. Recorded file origins follow the value.
    ///
    /// Fails with [`ConfigError::KeyNotFound`] when `from` is absent, and
    /// with the tree error `set` would raise when `to` cannot be written or
    /// `from` cannot be cleared. The tree is unchanged on failure.
    pub fn move_key(&mut self, from: impl Into<KeyArg>, to: impl Into<KeyArg>, merge: bool) -> Result<()> {
        let from = self.key(from)?;
        let to = self.key(to)?;

        if !self.tree.contains(&from) {
            return Err(ConfigError::KeyNotFound {
                key: self.canonical(&from),
            }
            .into());
        }
        self.tree.check_writable(&to)?;

        let value = self.tree.remove(&from)?.ok_or_else(|| ConfigError::KeyNotFound {
            key: self.canonical(&from),
        })?;
        let backup = value.clone();

        let written = if merge {
            self.tree.merge(&to, value, DEFAULT_REPLACE_KEY).map(|_| ())
        } else {
            self.tree.insert(&to, value).map(|_| ())
        };
        if let Err(e) = written {
            // Clearing `from` can invalidate `to` when one lies inside the other
            warn!("Moving {} to {} failed, restoring source: {}", from, to, e);
            self.tree.insert(&from, backup)?;
            return Err(e.into());
        }

        if let Some(metadata) = self.metadata.as_mut() {
            metadata.relocate(&from, &to);
        }
        debug!("Moved config key {} to {}", from, to);
        Ok(())
    }

    /// Discard every value and every recorded file origin.
    pub fn reset(&mut self) {
        self.tree = ConfigTree::new();
        if self.metadata.is_some() {
            self.metadata = Some(MetadataMap::new(self.options.separator.clone()));
        }
        debug!("Config store reset");
    }

    /// File origin recorded for `key` by a previous load.
    pub fn metadata(&self, key: impl Into<KeyArg>) -> Result<Option<&FileLocator>> {
        let key = self.key(key)?;
        Ok(self.metadata.as_ref().and_then(|metadata| metadata.get(&key)))
    }

    /// Read and parse a file, inserting the result into the tree.
    ///
    /// ```no_run
    /// use configurator_core::config::{ConfigOptions, ConfigStore};
    /// use configurator_core::storage::FileDescriptor;
    ///
    /// let mut config = ConfigStore::new(ConfigOptions::default())?;
    /// config.load("./conf/test.ini")?; // lands under "test"
    /// config.load(("developer", FileDescriptor::new("test.yaml").dir("./conf/")))?;
    /// # Ok::<(), configurator_core::Error>(())
    /// ```
    pub fn load(&mut self, target: impl Into<LoadTarget>) -> Result<&Value> {
        let (key, locator, codec) = self.prepare_load(target.into())?;
        info!("Loading {} into {}", locator.full_path().display(), key);
        let content = self.provider.read_to_string(locator.full_path())?;
        let value = codec.parse(&content)?;
        self.insert_loaded(&key, locator, value)
    }

    /// Load under an explicit key.
    pub fn load_at(&mut self, key: impl Into<KeyArg>, location: impl Into<FileSpec>) -> Result<&Value> {
        self.load(LoadTarget::at(key, location))
    }

    /// [`load`](Self::load) without blocking on file I/O. Nothing is inserted
    /// when reading or parsing fails.
    pub async fn load_async(&mut self, target: impl Into<LoadTarget>) -> Result<Value> {
        let (key, locator, codec) = self.prepare_load(target.into())?;
        info!("Loading {} into {} (async)", locator.full_path().display(), key);
        let content = self.provider.read_to_string_async(locator.full_path()).await?;
        let value = codec.parse(&content)?;
        self.insert_loaded(&key, locator, value).cloned()
    }

    /// Serialize the value at `key` to the file it was loaded from.
    pub fn store(&self, key: impl Into<KeyArg>) -> Result<()> {
        let (locator, text) = self.prepare_store(key.into(), None)?;
        self.provider.write_string(locator.full_path(), &text)
    }

    /// Serialize the value at `key` to an explicit location.
    pub fn store_to(&self, key: impl Into<KeyArg>, location: impl Into<FileSpec>) -> Result<()> {
        let (locator, text) = self.prepare_store(key.into(), Some(location.into()))?;
        self.provider.write_string(locator.full_path(), &text)
    }

    /// [`store`](Self::store) without blocking on file I/O.
    pub async fn store_async(&self, key: impl Into<KeyArg>) -> Result<()> {
        let (locator, text) = self.prepare_store(key.into(), None)?;
        self.provider.write_string_async(locator.full_path(), &text).await
    }

    /// [`store_to`](Self::store_to) without blocking on file I/O.
    pub async fn store_to_async(&self, key: impl Into<KeyArg>, location: impl Into<FileSpec>) -> Result<()> {
        let (locator, text) = self.prepare_store(key.into(), Some(location.into()))?;
        self.provider.write_string_async(locator.full_path(), &text).await
    }

    fn canonical(&self, key: &PathKey) -> String {
        key.recombine(&self.options.separator)
    }

    fn prepare_load(&self, target: LoadTarget) -> Result<(PathKey, FileLocator, Arc<Codec>)> {
        let (key, locator) = match target {
            LoadTarget::Location(location) => {
                let locator = FileLocator::resolve(&location);
                let key = PathKey::parse(locator.base_name(), &self.options.separator);
                (key, locator)
            }
            LoadTarget::At { key, location } => (self.key(key)?, FileLocator::resolve(&location)),
        };
        let codec = self.registry.codec(locator.format_type())?;
        Ok((key, locator, codec))
    }

    fn insert_loaded(&mut self, key: &PathKey, locator: FileLocator, value: Value) -> Result<&Value> {
        let stored = self.tree.insert(key, value)?;
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.record(key, locator);
        }
        Ok(stored)
    }

    /// Resolve destination, value and codec for a store, then serialize.
    fn prepare_store(&self, key: KeyArg, location: Option<FileSpec>) -> Result<(FileLocator, String)> {
        let key = self.key(key)?;
        let locator = match location {
            Some(location) => FileLocator::resolve(&location),
            None => self
                .metadata
                .as_ref()
                .and_then(|metadata| metadata.get(&key))
                .cloned()
                .ok_or_else(|| ConfigError::NoDestinationPath {
                    key: self.canonical(&key),
                })?,
        };
        let value = self.tree.get(&key).ok_or_else(|| ConfigError::KeyNotFound {
            key: self.canonical(&key),
        })?;
        let codec = self.registry.codec(locator.format_type())?;
        let text = codec.serialize(value)?;
        info!("Storing {} to {}", key, locator.full_path().display());
        Ok((locator, text))
    }
}
