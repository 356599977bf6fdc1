//! In-memory key-value store.
//!
//! Nothing is persisted; contents are lost when the store is dropped. Useful for tests
//! and for embedding the facade where no platform store exists.

use std::{collections::BTreeMap, sync::RwLock};

use url::Url;

use crate::{store::PersistentKeyValueStore, value::StoredValue};

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Value(StoredValue),
    Url(Url),
}

/// A [`PersistentKeyValueStore`] backed by a map guarded by an `RwLock`.
///
/// URLs live in their own slot kind. Through the generic path a URL slot reads as its
/// string form, and through the URL path a string slot is parsed as a URL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<BTreeMap<String, Slot>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .expect("RwLock should not be poisoned")
            .len()
    }

    /// Whether the store holds no slots at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All occupied slot keys, in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        self.slots
            .read()
            .expect("RwLock should not be poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn insert(&self, key: &str, slot: Slot) {
        self.slots
            .write()
            .expect("RwLock should not be poisoned")
            .insert(key.to_owned(), slot);
    }

    fn slot(&self, key: &str) -> Option<Slot> {
        self.slots
            .read()
            .expect("RwLock should not be poisoned")
            .get(key)
            .cloned()
    }
}

impl PersistentKeyValueStore for MemoryStore {
    fn value(&self, key: &str) -> Option<StoredValue> {
        match self.slot(key)? {
            Slot::Value(value) => Some(value),
            Slot::Url(url) => Some(StoredValue::String(url.into())),
        }
    }

    fn set_value(&self, key: &str, value: StoredValue) {
        self.insert(key, Slot::Value(value));
    }

    fn remove_value(&self, key: &str) {
        self.slots
            .write()
            .expect("RwLock should not be poisoned")
            .remove(key);
    }

    fn url(&self, key: &str) -> Option<Url> {
        match self.slot(key)? {
            Slot::Url(url) => Some(url),
            Slot::Value(StoredValue::String(s)) => Url::parse(&s).ok(),
            Slot::Value(_) => None,
        }
    }

    fn set_url(&self, key: &str, url: Url) {
        self.insert(key, Slot::Url(url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set_value("a", StoredValue::from(true));
        assert_eq!(store.value("a"), Some(StoredValue::Bool(true)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_key() {
        let store = MemoryStore::new();
        store.remove_value("missing");
        assert!(store.value("missing").is_none());
    }

    #[test]
    fn test_url_slot() {
        let store = MemoryStore::new();
        let url = Url::parse("https://example.com/path").unwrap();

        store.set_url("u", url.clone());
        assert_eq!(store.url("u"), Some(url));
        assert_eq!(
            store.value("u"),
            Some(StoredValue::from("https://example.com/path"))
        );
    }

    #[test]
    fn test_string_slot_parses_as_url() {
        let store = MemoryStore::new();
        store.set_value("good", StoredValue::from("file:///tmp/x"));
        store.set_value("bad", StoredValue::from("not a url"));
        store.set_value("number", StoredValue::from(1));

        assert_eq!(store.url("good").map(String::from), Some("file:///tmp/x".into()));
        assert!(store.url("bad").is_none());
        assert!(store.url("number").is_none());
    }

    #[test]
    fn test_keys_are_sorted() {
        let store = MemoryStore::new();
        store.set_value("b", StoredValue::from(1));
        store.set_value("a", StoredValue::from(2));
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    }
}
