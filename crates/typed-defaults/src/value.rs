//! Values accepted by the primitive read/write path.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde_bytes::ByteBuf;

/// An untyped value held by a [`PersistentKeyValueStore`](crate::PersistentKeyValueStore).
///
/// The store itself has no schema; this enum is the closed set of shapes the facade will
/// ever write into a slot. Binary blobs use [`ByteBuf`] so that `Vec<u8>` remains a plain
/// sequence of integers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    #[allow(missing_docs)]
    Bool(bool),
    #[allow(missing_docs)]
    String(String),
    /// Opaque binary blob, also used for serialized objects.
    Data(ByteBuf),
    /// Timestamp, always normalized to UTC.
    Date(DateTime<Utc>),
    #[allow(missing_docs)]
    Integer(i64),
    #[allow(missing_docs)]
    Float(f32),
    #[allow(missing_docs)]
    Double(f64),
    /// Homogeneous sequence of storable values.
    Array(Vec<StoredValue>),
    /// String-keyed mapping of storable values.
    Dictionary(BTreeMap<String, StoredValue>),
}

impl StoredValue {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Bool(_) => "bool",
            StoredValue::String(_) => "string",
            StoredValue::Data(_) => "data",
            StoredValue::Date(_) => "date",
            StoredValue::Integer(_) => "integer",
            StoredValue::Float(_) => "float",
            StoredValue::Double(_) => "double",
            StoredValue::Array(_) => "array",
            StoredValue::Dictionary(_) => "dictionary",
        }
    }
}

/// A type that can be written to and read back from a [`StoredValue`] without
/// serialization.
///
/// Reading is a type-checked downcast: `from_stored` returns `None` when the stored shape
/// does not match `Self`. Integers narrower than `i64` also return `None` when the stored
/// number does not fit.
pub trait Storable: Sized {
    /// Convert into the untyped stored form.
    fn into_stored(self) -> StoredValue;

    /// Attempt to recover `Self` from a stored value.
    fn from_stored(value: StoredValue) -> Option<Self>;
}

macro_rules! impl_storable {
    ($ty:ty, $variant:ident) => {
        impl Storable for $ty {
            fn into_stored(self) -> StoredValue {
                StoredValue::$variant(self)
            }

            fn from_stored(value: StoredValue) -> Option<Self> {
                match value {
                    StoredValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_storable!(bool, Bool);
impl_storable!(String, String);
impl_storable!(ByteBuf, Data);
impl_storable!(DateTime<Utc>, Date);
impl_storable!(i64, Integer);
impl_storable!(f32, Float);

macro_rules! impl_storable_integer {
    ($($ty:ty),*) => {
        $(
            impl Storable for $ty {
                fn into_stored(self) -> StoredValue {
                    StoredValue::Integer(i64::from(self))
                }

                fn from_stored(value: StoredValue) -> Option<Self> {
                    match value {
                        StoredValue::Integer(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_storable_integer!(i8, i16, i32, u8, u16, u32);

impl Storable for f64 {
    fn into_stored(self) -> StoredValue {
        StoredValue::Double(self)
    }

    fn from_stored(value: StoredValue) -> Option<Self> {
        match value {
            StoredValue::Double(v) => Some(v),
            StoredValue::Float(v) => Some(f64::from(v)),
            _ => None,
        }
    }
}

impl Storable for StoredValue {
    fn into_stored(self) -> StoredValue {
        self
    }

    fn from_stored(value: StoredValue) -> Option<Self> {
        Some(value)
    }
}

impl<T: Storable> Storable for Vec<T> {
    fn into_stored(self) -> StoredValue {
        StoredValue::Array(self.into_iter().map(Storable::into_stored).collect())
    }

    fn from_stored(value: StoredValue) -> Option<Self> {
        match value {
            StoredValue::Array(items) => items.into_iter().map(T::from_stored).collect(),
            _ => None,
        }
    }
}

impl<T: Storable> Storable for BTreeMap<String, T> {
    fn into_stored(self) -> StoredValue {
        StoredValue::Dictionary(
            self.into_iter()
                .map(|(k, v)| (k, v.into_stored()))
                .collect(),
        )
    }

    fn from_stored(value: StoredValue) -> Option<Self> {
        match value {
            StoredValue::Dictionary(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_stored(v).map(|v| (k, v)))
                .collect(),
            _ => None,
        }
    }
}

impl<T: Storable> Storable for HashMap<String, T> {
    fn into_stored(self) -> StoredValue {
        StoredValue::Dictionary(
            self.into_iter()
                .map(|(k, v)| (k, v.into_stored()))
                .collect(),
        )
    }

    fn from_stored(value: StoredValue) -> Option<Self> {
        match value {
            StoredValue::Dictionary(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_stored(v).map(|v| (k, v)))
                .collect(),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_stored_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StoredValue {
                fn from(value: $ty) -> Self {
                    value.into_stored()
                }
            }
        )*
    };
}

impl_from_for_stored_value!(bool, String, ByteBuf, i32, i64, f64, DateTime<Utc>);

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::String(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_narrowing() {
        assert_eq!(i32::from_stored(StoredValue::Integer(42)), Some(42));
        assert_eq!(u8::from_stored(StoredValue::Integer(300)), None);
        assert_eq!(u32::from_stored(StoredValue::Integer(-1)), None);
        assert_eq!(i64::from_stored(StoredValue::Double(1.0)), None);
    }

    #[test]
    fn test_double_accepts_float() {
        assert_eq!(f64::from_stored(StoredValue::Float(1.5)), Some(1.5));
        assert_eq!(f32::from_stored(StoredValue::Double(1.5)), None);
    }

    #[test]
    fn test_array_must_be_homogeneous() {
        let mixed = StoredValue::Array(vec![StoredValue::from("a"), StoredValue::from(1)]);
        assert_eq!(Vec::<String>::from_stored(mixed), None);

        let strings = vec!["a".to_string(), "b".to_string()].into_stored();
        assert_eq!(
            Vec::<String>::from_stored(strings),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_nested_dictionary() {
        let mut inner = BTreeMap::new();
        inner.insert("volume".to_string(), vec![1i64, 2, 3]);
        let stored = inner.clone().into_stored();

        assert_eq!(BTreeMap::<String, Vec<i64>>::from_stored(stored.clone()), Some(inner));
        assert_eq!(HashMap::<String, String>::from_stored(stored), None);
    }

    #[test]
    fn test_bytes_are_data_not_array() {
        assert_eq!(StoredValue::from(ByteBuf::from(vec![1u8, 2])).kind(), "data");
        assert_eq!(ByteBuf::from(vec![1u8, 2]).into_stored().kind(), "data");
        assert_eq!(vec![1u8, 2].into_stored().kind(), "array");
    }
}
