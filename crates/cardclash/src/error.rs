//! Unified error type for the server crate.

use cardclash_protocol::ProtocolError;
use cardclash_transport::TransportError;

/// Top-level error wrapping the layer-specific errors.
///
/// The `#[from]` attributes auto-generate `From` impls so the `?`
/// operator converts lower-layer errors automatically. Lobby validation
/// errors never appear here — they are surfaced to clients as `Error`
/// events, not propagated as Rust errors.
#[derive(Debug, thiserror::Error)]
pub enum CardclashError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let wrapped: CardclashError = err.into();
        assert!(matches!(wrapped, CardclashError::Transport(_)));
        assert!(wrapped.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let wrapped: CardclashError = err.into();
        assert!(matches!(wrapped, CardclashError::Protocol(_)));
    }
}
