use thiserror::Error;

/// Failure while encoding or decoding a structured object.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("CBOR encoding failed: {0}")]
    CborEncode(#[from] ciborium::ser::Error<std::io::Error>),
    #[error("CBOR decoding failed: {0}")]
    CborDecode(#[from] ciborium::de::Error<std::io::Error>),
    /// The blob does not start with the CBOR self-describe tag.
    #[error("blob is not tagged as CBOR")]
    MissingSelfDescribeTag,
    /// The blob holds more than one CBOR item.
    #[error("{0} trailing bytes after CBOR item")]
    TrailingBytes(usize),
}

/// A failure the settings facade recovered from by substituting absence.
///
/// These are never returned from reads or writes. They are logged and, when configured,
/// handed to a [`FailureObserver`](crate::FailureObserver).
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The slot holds a value of a different shape than the one requested.
    #[error("value stored at '{key}' is {found}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The stored raw value no longer maps to any case of the requested type.
    #[error("raw value stored at '{key}' does not map to any {target}")]
    UnknownRawValue {
        key: String,
        target: &'static str,
    },

    /// The object could not be serialized, so the slot was removed instead.
    #[error("failed to encode object for '{key}': {source}")]
    Encode {
        key: String,
        source: EncodingError,
    },

    /// The stored blob could not be deserialized.
    #[error("failed to decode object at '{key}': {source}")]
    Decode {
        key: String,
        source: EncodingError,
    },
}

impl SettingsError {
    /// The namespaced key the failure happened on.
    pub fn key(&self) -> &str {
        match self {
            SettingsError::TypeMismatch { key, .. }
            | SettingsError::UnknownRawValue { key, .. }
            | SettingsError::Encode { key, .. }
            | SettingsError::Decode { key, .. } => key,
        }
    }
}

/// Problems found by [`validate_catalog`](crate::validate_catalog).
#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyCatalogError {
    #[error("Setting key at position {0} has an empty raw value")]
    EmptyRawValue(usize),

    #[error("Raw value '{0}' is used by more than one setting key")]
    DuplicateRawValue(&'static str),

    #[error("Raw value '{0}' does not reconstruct the key it came from")]
    NotRoundTripping(&'static str),

    #[error("Clear key '{0}' is not part of the catalog")]
    UnknownClearKey(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = SettingsError::TypeMismatch {
            key: "app.theme".to_string(),
            expected: "i64",
            found: "string",
        };
        assert_eq!(failure.key(), "app.theme");
        assert!(failure.to_string().contains("app.theme"));
        assert!(failure.to_string().contains("not i64"));
    }

    #[test]
    fn test_trailing_bytes_display() {
        let err = EncodingError::TrailingBytes(3);
        assert_eq!(err.to_string(), "3 trailing bytes after CBOR item");
        assert_eq!(
            EncodingError::MissingSelfDescribeTag.to_string(),
            "blob is not tagged as CBOR"
        );
    }
}
