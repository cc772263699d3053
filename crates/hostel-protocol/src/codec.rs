//! Codec trait and implementations for persisting records.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The session layer doesn't care HOW a record is serialized before it
//! hits disk — it just needs something that implements [`Codec`].
//!
//! Currently we provide [`JsonCodec`]: the persisted session is a single
//! JSON object, readable with any text editor when debugging a device.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Turns a record into the bytes handed to storage, and back.
///
/// `Send + Sync + 'static` because one codec instance sits inside the
/// shared session repository for the life of the process.
pub trait Codec: Send + Sync + 'static {
    /// # Errors
    /// [`ProtocolError::Encode`] if `value` can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// # Errors
    /// [`ProtocolError::Decode`] for truncated, hand-edited, or foreign
    /// bytes.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// The default [`Codec`]: compact JSON via `serde_json`. Needs the `json`
/// feature (on by default).
///
/// ## Example
///
/// ```rust
/// use hostel_protocol::{Codec, JsonCodec, Role, SessionRecord};
///
/// let codec = JsonCodec;
/// let record = SessionRecord::mock(Role::Admin, None);
///
/// let bytes = codec.encode(&record).unwrap();
/// let decoded: SessionRecord = codec.decode(&bytes).unwrap();
/// assert_eq!(record, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
