//! Codec trait and implementations.
//!
//! A codec converts between wire messages and raw bytes. The rest of the
//! stack only sees the [`Codec`] trait, so the encoding can change (e.g.
//! to a binary format) without touching the handler or lobby layers.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes wire messages to bytes and decodes them back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that speaks JSON via `serde_json`.
///
/// Human-readable, inspectable in browser devtools, and what the web
/// client expects. Behind the `json` feature (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientIntent, ServerEvent};

    #[test]
    fn test_intent_round_trip_through_codec() {
        let codec = JsonCodec;
        let intent = ClientIntent::Gamble;
        let bytes = codec.encode(&intent).unwrap();
        let decoded: ClientIntent = codec.decode(&bytes).unwrap();
        assert_eq!(intent, decoded);
    }

    #[test]
    fn test_event_round_trip_through_codec() {
        let codec = JsonCodec;
        let event = ServerEvent::Error {
            message: "lobby not found".into(),
        };
        let bytes = codec.encode(&event).unwrap();
        let decoded: ServerEvent = codec.decode(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let codec = JsonCodec;
        let result: Result<ClientIntent, _> = codec.decode(b"not json");
        assert!(result.is_err());
    }
}
