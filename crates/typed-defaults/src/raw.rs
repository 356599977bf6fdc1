//! Types that are stored through a canonical raw value, typically enums.

use crate::value::Storable;

/// A type isomorphic to a small set of cases, each with a canonical storable raw value.
///
/// Only the raw value reaches the store. Reading reconstructs the case from it, so a raw
/// value that no longer maps to any case reads as absent.
pub trait RawRepresentable: Sized {
    /// The storable type of the raw values.
    type Raw: Storable;

    /// The raw value of this case.
    fn raw_value(&self) -> Self::Raw;

    /// Reconstruct a case from a raw value, if one matches.
    fn from_raw_value(raw: Self::Raw) -> Option<Self>;
}

/// Declare an enum together with its [`RawRepresentable`] implementation.
///
/// # Example
/// ```rust
/// use typed_defaults::{raw_representable, RawRepresentable};
///
/// raw_representable! {
///     #[derive(Debug, PartialEq, Eq)]
///     pub enum Theme: String {
///         Light = "light",
///         Dark = "dark",
///     }
/// }
///
/// assert_eq!(Theme::Dark.raw_value(), "dark");
/// assert_eq!(Theme::from_raw_value("light".to_string()), Some(Theme::Light));
/// assert_eq!(Theme::from_raw_value("sepia".to_string()), None);
/// ```
#[macro_export]
macro_rules! raw_representable {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $raw:ty {
            $($variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        $vis enum $name {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl $crate::RawRepresentable for $name {
            type Raw = $raw;

            fn raw_value(&self) -> $raw {
                match self {
                    $(Self::$variant => <$raw>::from($value),)+
                }
            }

            fn from_raw_value(raw: $raw) -> ::core::option::Option<Self> {
                $(
                    if raw == <$raw>::from($value) {
                        return ::core::option::Option::Some(Self::$variant);
                    }
                )+
                ::core::option::Option::None
            }
        }
    };
}
