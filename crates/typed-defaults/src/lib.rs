#![doc = include_str!("../README.md")]

mod encoding;
mod error;
mod key;
mod memory;
mod raw;
mod settings;
mod store;
mod value;

pub use encoding::ObjectEncoding;
pub use error::{EncodingError, KeyCatalogError, SettingsError};
pub use key::{validate_catalog, SettingKey};
pub use memory::MemoryStore;
pub use raw::RawRepresentable;
pub use settings::{FailureObserver, TypedSettingsStore};
pub use store::PersistentKeyValueStore;
pub use value::{Storable, StoredValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stores_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<MemoryStore>();
        assert_send_sync::<TypedSettingsStore<Sample>>();
    }

    crate::setting_keys! {
        enum Sample {
            Only = "only",
        }
    }
}
