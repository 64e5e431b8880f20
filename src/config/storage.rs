//! Local-storage backends
//!
//! A browser-style key/value string store. Every simulator writes its config
//! under its own key; nothing else is shared between keys.

#[cfg(test)]
use std::cell::Cell;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    #[cfg(test)]
    #[error("storage is disabled")]
    Disabled,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Key/value string storage with local-storage semantics
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Total bytes the entries would occupy, counted like browsers do (keys + values)
fn usage_with(entries: &BTreeMap<String, String>, key: &str, value: &str) -> usize {
    entries
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum::<usize>()
        + key.len()
        + value.len()
}

/// File-backed storage: one JSON object holding every entry
pub struct FileStorage {
    path: PathBuf,
    quota: usize,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Default location under the platform data directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(storage::APP_DIR);
        path.push(storage::FILENAME);
        path
    }

    /// Open the storage file, starting empty when it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => {
                    info!(path = %path.display(), keys = entries.len(), "Loaded local storage");
                    entries
                }
                Err(e) => {
                    // Left on disk untouched until the next successful write replaces it
                    warn!(path = %path.display(), error = %e, "Local storage file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No local storage file yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read local storage, starting empty");
                BTreeMap::new()
            }
        };

        Self {
            path,
            quota: storage::QUOTA_BYTES,
            entries: RefCell::new(entries),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow().clone();
        let needed = usage_with(&entries, key, value);
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded { needed, quota: self.quota });
        }

        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)?;
        *self.entries.borrow_mut() = entries;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow().clone();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&entries)?;
        *self.entries.borrow_mut() = entries;
        Ok(())
    }
}

/// In-memory storage, optionally with a quota or disabled entirely
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
    disabled: Cell<bool>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Reads keep working, every write fails
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Write a raw value, bypassing quota and disabled checks
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.disabled.get() {
            return Err(StorageError::Disabled);
        }
        if let Some(quota) = self.quota {
            let needed = usage_with(&self.entries.borrow(), key, value);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.disabled.get() {
            return Err(StorageError::Disabled);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("jimmydev-storage-{}-{}", std::process::id(), name));
        path.push(storage::FILENAME);
        path
    }

    #[test]
    fn test_memory_storage_set_get_remove() {
        let backend = MemoryStorage::new();
        assert_eq!(backend.get_item("a"), None);

        backend.set_item("a", "1").unwrap();
        assert_eq!(backend.get_item("a").as_deref(), Some("1"));

        backend.remove_item("a").unwrap();
        assert_eq!(backend.get_item("a"), None);
    }

    #[test]
    fn test_memory_storage_quota_counts_other_keys() {
        let backend = MemoryStorage::with_quota(10);
        backend.set_item("k1", "abc").unwrap(); // 5 bytes

        let err = backend.set_item("k2", "abcdef").unwrap_err(); // 5 + 8 > 10
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 13, quota: 10 }));

        // Replacing an existing key only counts the new value
        backend.set_item("k1", "abcdefgh").unwrap();
    }

    #[test]
    fn test_memory_storage_disabled() {
        let backend = MemoryStorage::new();
        backend.insert_raw("k", "v");
        backend.set_disabled(true);

        assert!(matches!(backend.set_item("k", "w"), Err(StorageError::Disabled)));
        assert_eq!(backend.get_item("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        let backend = FileStorage::open(&path);
        backend.set_item("jimmydev-app-simulator", "{\"darkMode\":true}").unwrap();

        let reopened = FileStorage::open(&path);
        assert_eq!(
            reopened.get_item("jimmydev-app-simulator").as_deref(),
            Some("{\"darkMode\":true}")
        );

        reopened.remove_item("jimmydev-app-simulator").unwrap();
        assert_eq!(FileStorage::open(&path).get_item("jimmydev-app-simulator"), None);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_storage_malformed_file_starts_empty() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let backend = FileStorage::open(&path);
        assert_eq!(backend.get_item("anything"), None);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
