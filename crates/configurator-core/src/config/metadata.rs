use std::collections::HashMap;

use crate::key::PathKey;
use crate::storage::FileLocator;

/// File origin of loaded keys, indexed by canonical key string.
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
    separator: String,
    entries: HashMap<String, FileLocator>,
}

impl MetadataMap {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            entries: HashMap::new(),
        }
    }

    pub fn canonical(&self, key: &PathKey) -> String {
        key.recombine(&self.separator)
    }

    pub fn record(&mut self, key: &PathKey, locator: FileLocator) {
        self.entries.insert(self.canonical(key), locator);
    }

    pub fn get(&self, key: &PathKey) -> Option<&FileLocator> {
        self.entries.get(&self.canonical(key))
    }

    /// Drop the entry for `key` and for every key underneath it.
    pub fn purge(&mut self, key: &PathKey) -> usize {
        let (exact, prefix) = self.subtree_matchers(key);
        let before = self.entries.len();
        self.entries
            .retain(|canonical, _| canonical != &exact && !canonical.starts_with(&prefix));
        before - self.entries.len()
    }

    /// Re-key the entries for `from` and its descendants under `to`.
    pub fn relocate(&mut self, from: &PathKey, to: &PathKey) -> usize {
        let (exact, prefix) = self.subtree_matchers(from);
        let target = self.canonical(to);
        let moved: Vec<(String, FileLocator)> = self
            .entries
            .iter()
            .filter(|(canonical, _)| *canonical == &exact || canonical.starts_with(&prefix))
            .map(|(canonical, locator)| (canonical.clone(), locator.clone()))
            .collect();

        for (canonical, _) in &moved {
            self.entries.remove(canonical);
        }
        let count = moved.len();
        for (canonical, locator) in moved {
            let relocated = format!("{}{}", target, &canonical[exact.len()..]);
            self.entries.insert(relocated, locator);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn subtree_matchers(&self, key: &PathKey) -> (String, String) {
        let exact = self.canonical(key);
        let prefix = format!("{}{}", exact, self.separator);
        (exact, prefix)
    }
}
