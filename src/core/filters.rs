//! The user's ignore list and its on-disk store.
//!
//! Reward names in the set are hidden by the matcher (when name filtering is
//! on) and shown dimmed in the reward view.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Set of reward names the user does not want to be notified about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    names: BTreeSet<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns true if the name was not already filtered.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Returns true if the name was filtered.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// Flip the filter state of a name. Returns true if it is now filtered.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FilterSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Persists the filter set as `filters.json` in the config directory.
pub struct FilterStore {
    path: PathBuf,
}

impl FilterStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join("filters.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the filter set. A missing file is an empty set; a corrupt file is
    /// logged and treated as empty.
    pub fn load(&self) -> io::Result<FilterSet> {
        if !self.path.exists() {
            return Ok(FilterSet::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable filter file {:?}: {}", self.path, e);
            FilterSet::new()
        }))
    }

    pub fn save(&self, filters: &FilterSet) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(filters)?;
        fs::write(&self.path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_toggle() {
        let mut filters = FilterSet::new();
        assert!(filters.toggle("Nitain Extract"));
        assert!(filters.contains("Nitain Extract"));
        assert!(!filters.toggle("Nitain Extract"));
        assert!(!filters.contains("Nitain Extract"));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_add_remove() {
        let mut filters = FilterSet::new();
        assert!(filters.add("Alloy Plate"));
        assert!(!filters.add("Alloy Plate"));
        assert_eq!(filters.len(), 1);
        assert!(filters.remove("Alloy Plate"));
        assert!(!filters.remove("Alloy Plate"));
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = tempdir().unwrap();
        let store = FilterStore::new(dir.path());

        assert!(store.load().unwrap().is_empty());

        let filters: FilterSet = ["Serration", "Alloy Plate"].into_iter().collect();
        store.save(&filters).unwrap();

        let loaded = FilterStore::new(dir.path()).load().unwrap();
        assert_eq!(loaded, filters);
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["Alloy Plate", "Serration"]);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FilterStore::new(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
