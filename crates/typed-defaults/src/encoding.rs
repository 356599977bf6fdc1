//! Serialization of structured objects into opaque blobs.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::EncodingError;

/// CBOR self-describe tag (55799). Every structured-binary blob starts with it, and no JSON
/// text can, so neither encoding decodes the other's blobs.
const CBOR_SELF_DESCRIBE: [u8; 3] = [0xd9, 0xd9, 0xf7];

/// How a structured object is turned into bytes before it reaches the store.
///
/// The two encodings are interchangeable at the API level but not compatible with each
/// other: a blob written with one will not decode with the other. Pick one per key and
/// keep it for the lifetime of the stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectEncoding {
    /// UTF-8 JSON text, via `serde_json`.
    #[default]
    Json,
    /// Compact binary records, encoded as CBOR via `ciborium`.
    StructuredBinary,
}

impl ObjectEncoding {
    /// Serialize `value` into a blob.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>, EncodingError> {
        match self {
            ObjectEncoding::Json => Ok(serde_json::to_vec(value)?),
            ObjectEncoding::StructuredBinary => {
                let mut bytes = CBOR_SELF_DESCRIBE.to_vec();
                ciborium::ser::into_writer(value, &mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// Deserialize a blob previously produced by [`encode`](Self::encode) with the same
    /// encoding.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, EncodingError> {
        match self {
            ObjectEncoding::Json => Ok(serde_json::from_slice(bytes)?),
            ObjectEncoding::StructuredBinary => {
                let mut reader = bytes
                    .strip_prefix(&CBOR_SELF_DESCRIBE[..])
                    .ok_or(EncodingError::MissingSelfDescribeTag)?;
                let value = ciborium::de::from_reader(&mut reader)?;
                // ciborium stops after the first item, anything left over means the blob
                // was not written by us.
                if !reader.is_empty() {
                    return Err(EncodingError::TrailingBytes(reader.len()));
                }
                Ok(value)
            }
        }
    }
}
