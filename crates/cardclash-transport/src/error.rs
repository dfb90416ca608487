//! Error types for the transport layer.

/// Errors that can occur during transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Accepting an incoming connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(std::io::Error),

    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(std::io::Error),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(std::io::Error),

    /// The connection was closed unexpectedly.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),
}
