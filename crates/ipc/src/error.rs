//! Error types for the shell protocol.

/// Errors raised while encoding or decoding shell messages.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Malformed shell message: {0}")]
    Serialize(#[from] serde_json::Error),
}
