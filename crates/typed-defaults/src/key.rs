//! Closed catalogs of setting keys.

use std::collections::HashSet;

use crate::{error::KeyCatalogError, value::StoredValue};

/// A key drawn from a closed, enumerable catalog.
///
/// Every key has a stable string form that is used, after namespacing, as the slot
/// identifier in the underlying store. Implement this with the
/// [`setting_keys!`](crate::setting_keys) macro rather than by hand.
pub trait SettingKey: Copy + 'static {
    /// Every key in the catalog, in declaration order.
    const ALL: &'static [Self];

    /// The canonical string form of this key.
    fn raw_value(&self) -> &'static str;

    /// Reconstruct a key from its canonical string form.
    fn from_raw_value(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.raw_value() == raw)
    }

    /// The ordered subset of keys removed by
    /// [`TypedSettingsStore::clear_all`](crate::TypedSettingsStore::clear_all).
    fn clear_keys() -> &'static [Self] {
        Self::ALL
    }

    /// Value used by
    /// [`TypedSettingsStore::get_or_default`](crate::TypedSettingsStore::get_or_default)
    /// when the slot is empty.
    fn default_value(&self) -> Option<StoredValue> {
        None
    }
}

/// Check that a catalog is well-formed: raw values are non-empty, unique and
/// round-trip through [`SettingKey::from_raw_value`], and every clear key belongs to the
/// catalog.
pub fn validate_catalog<K: SettingKey>() -> Result<(), KeyCatalogError> {
    let mut seen = HashSet::new();
    for (index, key) in K::ALL.iter().enumerate() {
        let raw = key.raw_value();
        if raw.is_empty() {
            return Err(KeyCatalogError::EmptyRawValue(index));
        }
        if !seen.insert(raw) {
            return Err(KeyCatalogError::DuplicateRawValue(raw));
        }
        match K::from_raw_value(raw) {
            Some(rebuilt) if rebuilt.raw_value() == raw => {}
            _ => return Err(KeyCatalogError::NotRoundTripping(raw)),
        }
    }

    for key in K::clear_keys() {
        if !seen.contains(key.raw_value()) {
            return Err(KeyCatalogError::UnknownClearKey(key.raw_value()));
        }
    }

    Ok(())
}

/// Declare a catalog of setting keys.
///
/// Each variant maps to its raw string and may carry a default value. An optional
/// `clear = [...]` list restricts which keys are removed by `clear_all`; without it every
/// key is cleared.
///
/// # Example
/// ```rust
/// use typed_defaults::{setting_keys, SettingKey, StoredValue};
///
/// setting_keys! {
///     #[derive(Debug, PartialEq, Eq)]
///     pub enum AppKey {
///         Theme = "theme" => "light",
///         LaunchCount = "launch_count",
///         DeviceId = "device_id",
///     }
///     clear = [Theme, LaunchCount];
/// }
///
/// assert_eq!(AppKey::from_raw_value("theme"), Some(AppKey::Theme));
/// assert_eq!(AppKey::clear_keys(), &[AppKey::Theme, AppKey::LaunchCount]);
/// assert_eq!(AppKey::Theme.default_value(), Some(StoredValue::from("light")));
/// ```
#[macro_export]
macro_rules! setting_keys {
    (@default) => {
        ::core::option::Option::None
    };
    (@default $default:expr) => {
        ::core::option::Option::Some($crate::StoredValue::from($default))
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $raw:literal $(=> $default:expr)?),+ $(,)?
        }
        $(clear = [$($clear:ident),* $(,)?];)?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        $vis enum $name {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl $crate::SettingKey for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn raw_value(&self) -> &'static str {
                match self {
                    $(Self::$variant => $raw,)+
                }
            }

            $(
                fn clear_keys() -> &'static [Self] {
                    &[$(Self::$clear),*]
                }
            )?

            fn default_value(&self) -> ::core::option::Option<$crate::StoredValue> {
                match self {
                    $(Self::$variant => $crate::setting_keys!(@default $($default)?),)+
                }
            }
        }
    };
}
