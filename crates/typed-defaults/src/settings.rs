//! Typed access to a namespaced slice of a key-value store.

use std::{any::type_name, marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_bytes::ByteBuf;
use tracing::{debug, warn};
use url::Url;

use crate::{
    encoding::ObjectEncoding,
    error::SettingsError,
    key::SettingKey,
    raw::RawRepresentable,
    store::PersistentKeyValueStore,
    value::{Storable, StoredValue},
};

/// Callback notified of every failure the store recovered from.
pub type FailureObserver = Arc<dyn Fn(&SettingsError) + Send + Sync>;

/// Typed settings access for the keys of catalog `K`.
///
/// Every key is addressed in the underlying store as `prefix + key.raw_value()`. The
/// prefix is fixed at construction, so two instances with different prefixes over the
/// same store never see each other's values.
///
/// Reads never fail: a missing slot, a value of the wrong shape, an unknown raw value and
/// an undecodable blob all read as `None`. Writing `None` removes the slot.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
///
/// use typed_defaults::{setting_keys, MemoryStore, TypedSettingsStore};
///
/// setting_keys! {
///     pub enum AppKey {
///         Theme = "theme",
///     }
/// }
///
/// let settings = TypedSettingsStore::<AppKey>::new("app.", Arc::new(MemoryStore::new()));
///
/// settings.set(Some("dark".to_string()), AppKey::Theme);
/// assert_eq!(settings.get::<String>(AppKey::Theme), Some("dark".to_string()));
/// assert_eq!(settings.get::<i64>(AppKey::Theme), None);
/// ```
pub struct TypedSettingsStore<K: SettingKey> {
    prefix: String,
    store: Arc<dyn PersistentKeyValueStore>,
    observer: Option<FailureObserver>,
    _marker: PhantomData<fn() -> K>,
}

impl<K: SettingKey> Clone for TypedSettingsStore<K> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            store: Arc::clone(&self.store),
            observer: self.observer.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K: SettingKey> std::fmt::Debug for TypedSettingsStore<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedSettingsStore")
            .field("prefix", &self.prefix)
            .field("keys", &type_name::<K>())
            .finish()
    }
}

impl<K: SettingKey> TypedSettingsStore<K> {
    /// Create a store that namespaces every key of `K` with `prefix`.
    pub fn new(prefix: impl Into<String>, store: Arc<dyn PersistentKeyValueStore>) -> Self {
        Self {
            prefix: prefix.into(),
            store,
            observer: None,
            _marker: PhantomData,
        }
    }

    /// Report recovered failures to `observer` in addition to logging them.
    ///
    /// This does not change any return value.
    pub fn with_failure_observer(
        mut self,
        observer: impl Fn(&SettingsError) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// The namespace prefix of this store.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The slot identifier used for `key` in the underlying store.
    pub fn namespaced_key(&self, key: K) -> String {
        format!("{}{}", self.prefix, key.raw_value())
    }

    /// Store a storable value, or remove the slot when `value` is `None`.
    pub fn set<T: Storable>(&self, value: Option<T>, key: K) {
        let slot = self.namespaced_key(key);
        match value {
            Some(value) => self.store.set_value(&slot, value.into_stored()),
            None => self.store.remove_value(&slot),
        }
    }

    /// Read a storable value.
    ///
    /// Returns `None` if the slot is empty or holds a value of another shape.
    pub fn get<T: Storable>(&self, key: K) -> Option<T> {
        let slot = self.namespaced_key(key);
        self.read_slot(&slot)
    }

    /// Read a storable value, falling back to the key's declared default when the slot is
    /// empty or unreadable.
    pub fn get_or_default<T: Storable>(&self, key: K) -> Option<T> {
        self.get(key).or_else(|| key.default_value().and_then(T::from_stored))
    }

    /// Store a URL through the store's URL accessor, or remove the slot when `value` is
    /// `None`.
    pub fn set_url(&self, value: Option<Url>, key: K) {
        let slot = self.namespaced_key(key);
        match value {
            Some(url) => self.store.set_url(&slot, url),
            None => self.store.remove_value(&slot),
        }
    }

    /// Read a URL through the store's URL accessor.
    pub fn url(&self, key: K) -> Option<Url> {
        self.store.url(&self.namespaced_key(key))
    }

    /// Store the raw value of `value`, or remove the slot when `value` is `None`.
    pub fn set_raw<T: RawRepresentable>(&self, value: Option<T>, key: K) {
        self.set(value.map(|v| v.raw_value()), key);
    }

    /// Read a raw value and reconstruct `T` from it.
    ///
    /// Returns `None` if the raw value is missing, of the wrong type, or does not map to
    /// any case of `T`.
    pub fn get_raw<T: RawRepresentable>(&self, key: K) -> Option<T> {
        let slot = self.namespaced_key(key);
        let raw = self.read_slot::<T::Raw>(&slot)?;
        let value = T::from_raw_value(raw);
        if value.is_none() {
            debug!("Raw value at '{}' does not map to any {}", slot, type_name::<T>());
            self.report(SettingsError::UnknownRawValue {
                key: slot,
                target: type_name::<T>(),
            });
        }
        value
    }

    /// Serialize `value` with `encoding` and store the resulting blob, or remove the slot
    /// when `value` is `None`.
    ///
    /// If serialization fails the slot is removed; the error is logged, not returned.
    pub fn set_object<T: Serialize>(&self, value: Option<&T>, key: K, encoding: ObjectEncoding) {
        let slot = self.namespaced_key(key);
        let Some(value) = value else {
            self.store.remove_value(&slot);
            return;
        };

        match encoding.encode(value) {
            Ok(bytes) => self
                .store
                .set_value(&slot, StoredValue::Data(ByteBuf::from(bytes))),
            Err(e) => {
                warn!("Failed to encode setting '{}': {:?}", slot, e);
                self.store.remove_value(&slot);
                self.report(SettingsError::Encode {
                    key: slot,
                    source: e,
                });
            }
        }
    }

    /// Read a blob and deserialize it with `encoding`.
    ///
    /// Returns `None` if the slot is empty, does not hold a blob, or the blob does not
    /// decode as `T` with this encoding. A never-written key and corrupt data are
    /// indistinguishable.
    pub fn get_object<T: DeserializeOwned>(&self, key: K, encoding: ObjectEncoding) -> Option<T> {
        let slot = self.namespaced_key(key);
        let bytes = self.read_slot::<ByteBuf>(&slot)?;

        match encoding.decode(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to decode setting '{}': {:?}", slot, e);
                self.report(SettingsError::Decode {
                    key: slot,
                    source: e,
                });
                None
            }
        }
    }

    /// Whether the slot for `key` currently holds any value.
    ///
    /// URL slots are checked through the store's URL accessor as well, since a store may
    /// not expose them through [`PersistentKeyValueStore::value`].
    pub fn contains(&self, key: K) -> bool {
        let slot = self.namespaced_key(key);
        self.store.value(&slot).is_some() || self.store.url(&slot).is_some()
    }

    /// Remove the slot for `key`, whatever type was stored in it.
    pub fn clear(&self, key: K) {
        self.store.remove_value(&self.namespaced_key(key));
    }

    /// Remove the slot of every key in [`SettingKey::clear_keys`], in catalog order.
    ///
    /// Keys are cleared one by one; the operation is not atomic.
    pub fn clear_all(&self) {
        let keys = K::clear_keys();
        debug!("Clearing {} settings under prefix '{}'", keys.len(), self.prefix);
        for key in keys {
            self.clear(*key);
        }
    }

    fn read_slot<T: Storable>(&self, slot: &str) -> Option<T> {
        let stored = self.store.value(slot)?;
        let found = stored.kind();
        let value = T::from_stored(stored);
        if value.is_none() {
            debug!(
                "Setting '{}' holds {}, requested {}",
                slot,
                found,
                type_name::<T>()
            );
            self.report(SettingsError::TypeMismatch {
                key: slot.to_owned(),
                expected: type_name::<T>(),
                found,
            });
        }
        value
    }

    fn report(&self, failure: SettingsError) {
        if let Some(observer) = &self.observer {
            observer(&failure);
        }
    }
}
