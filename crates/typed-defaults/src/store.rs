use url::Url;

use crate::value::StoredValue;

/// The key-value persistence layer the settings facade delegates to.
///
/// Implementations are expected to be thread-safe and are typically shared process-wide,
/// since every [`TypedSettingsStore`](crate::TypedSettingsStore) holds the store behind an
/// `Arc`. The facade never enumerates the store; it only touches keys derived from its own
/// key catalog.
///
/// Concurrent writers to the same key are resolved by the implementation, usually
/// last-write-wins.
pub trait PersistentKeyValueStore: Send + Sync {
    /// Retrieves the value stored under `key`, if any.
    fn value(&self, key: &str) -> Option<StoredValue>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_value(&self, key: &str, value: StoredValue);
    /// Removes the value stored under `key`. Removing a missing key is not an error.
    fn remove_value(&self, key: &str);
    /// Retrieves the value stored under `key` as a URL.
    ///
    /// URLs have their own accessor because they are not guaranteed to round-trip through
    /// [`value`](Self::value).
    fn url(&self, key: &str) -> Option<Url>;
    /// Stores `url` under `key`, replacing any previous value.
    fn set_url(&self, key: &str, url: Url);
}
