//! Typed config store over a [`StorageBackend`]
//!
//! One store per storage key. Reads fall back to the default on absence or
//! parse failure without touching storage. Writes replace the whole value,
//! persist it as JSON and notify subscribers. A failed write is logged and
//! remembered, but the in-memory value still changes so the session keeps
//! working.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::storage::{StorageBackend, StorageError};

/// Read and parse `key`, or `None` when absent or unparsable
pub fn read_json<T: DeserializeOwned>(backend: &dyn StorageBackend, key: &str) -> Option<T> {
    let raw = backend.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Stored value is not valid JSON for this type, using default");
            None
        }
    }
}

/// Serialize `value` and write it under `key`
pub fn write_json<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    backend.set_item(key, &json)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Box<dyn FnMut(&T)>;

pub struct ConfigStore<T> {
    key: String,
    backend: Rc<dyn StorageBackend>,
    value: T,
    default: T,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_subscription: u64,
    last_persist_error: Option<String>,
}

impl<T> ConfigStore<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq,
{
    /// Load `key` from storage, or start from `default`
    pub fn open(backend: Rc<dyn StorageBackend>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = match read_json::<T>(backend.as_ref(), &key) {
            Some(value) => {
                debug!(key = %key, "Loaded stored config");
                value
            }
            None => default.clone(),
        };

        Self {
            key,
            backend,
            value,
            default,
            subscribers: Vec::new(),
            next_subscription: 0,
            last_persist_error: None,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the whole value, persist it and notify subscribers
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.value);
        }
    }

    /// Copy, modify, then [`set`](Self::set) the copy if it differs
    ///
    /// Returns whether anything was written.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.value.clone();
        f(&mut next);
        if next == self.value {
            return false;
        }
        self.set(next);
        true
    }

    /// Restore the default value
    pub fn reset(&mut self) {
        self.set(self.default.clone());
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Error of the most recent write, cleared by the next successful one
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    fn persist(&mut self) {
        match write_json(self.backend.as_ref(), &self.key, &self.value) {
            Ok(()) => {
                self.last_persist_error = None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to persist config, keeping in-memory value for this session");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::storage::MemoryStorage;
    use serde::Deserialize;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        name: String,
        count: u32,
    }

    fn defaults() -> Prefs {
        Prefs {
            name: "default".to_string(),
            count: 0,
        }
    }

    #[test]
    fn test_open_missing_key_uses_default_without_writing() {
        let backend = Rc::new(MemoryStorage::new());
        let store = ConfigStore::open(backend.clone(), "prefs", defaults());

        assert_eq!(store.get(), &defaults());
        assert_eq!(backend.get_item("prefs"), None);
    }

    #[test]
    fn test_open_unparsable_value_uses_default_and_leaves_storage() {
        let backend = Rc::new(MemoryStorage::new());
        backend.insert_raw("prefs", "{broken");

        let store = ConfigStore::open(backend.clone(), "prefs", defaults());
        assert_eq!(store.get(), &defaults());
        assert_eq!(backend.get_item("prefs").as_deref(), Some("{broken"));
    }

    #[test]
    fn test_set_then_reopen_round_trip() {
        let backend = Rc::new(MemoryStorage::new());
        let mut store = ConfigStore::open(backend.clone(), "prefs", defaults());
        store.set(Prefs {
            name: "custom".to_string(),
            count: 7,
        });

        let reopened = ConfigStore::open(backend, "prefs", defaults());
        assert_eq!(reopened.get(), store.get());
    }

    #[test]
    fn test_write_failure_keeps_in_memory_value() {
        let backend = Rc::new(MemoryStorage::new());
        let mut store = ConfigStore::open(backend.clone(), "prefs", defaults());
        backend.set_disabled(true);

        store.update(|p| p.count = 3);
        assert_eq!(store.get().count, 3);
        assert!(store.last_persist_error().is_some());
        assert_eq!(backend.get_item("prefs"), None);

        backend.set_disabled(false);
        store.update(|p| p.count = 4);
        assert!(store.last_persist_error().is_none());
    }

    #[test]
    fn test_quota_failure_reported() {
        let backend = Rc::new(MemoryStorage::with_quota(16));
        let mut store = ConfigStore::open(backend, "prefs", defaults());

        store.update(|p| p.name = "x".repeat(64));
        assert_eq!(store.get().name.len(), 64);
        assert!(store.last_persist_error().unwrap().contains("quota"));
    }

    #[test]
    fn test_subscribers_notified_until_unsubscribed() {
        let backend = Rc::new(MemoryStorage::new());
        let mut store = ConfigStore::open(backend, "prefs", defaults());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |p: &Prefs| sink.borrow_mut().push(p.count));

        store.update(|p| p.count = 1);
        store.update(|p| p.count = 2);
        assert!(store.unsubscribe(id));
        store.update(|p| p.count = 3);

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let backend = Rc::new(MemoryStorage::new());
        let mut store = ConfigStore::open(backend, "prefs", defaults());
        store.update(|p| p.count = 9);

        store.reset();
        let once = store.get().clone();
        store.reset();
        assert_eq!(store.get(), &once);
        assert_eq!(once, defaults());
    }

    #[test]
    fn test_update_persists_only_on_change() {
        let backend = Rc::new(MemoryStorage::new());
        let mut store = ConfigStore::open(backend.clone(), "prefs", defaults());

        assert!(!store.update(|_| {}));
        assert!(!store.update(|p| p.count = 0));
        assert_eq!(backend.get_item("prefs"), None);

        assert!(store.update(|p| p.count = 5));
        let stored: Prefs = read_json(backend.as_ref(), "prefs").unwrap();
        assert_eq!(stored.count, 5);
    }
}
