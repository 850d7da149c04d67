//! Gateway client errors

use crate::protocol::DecodeError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors surfaced to callers of [`GatewayConnection`](crate::GatewayConnection)
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The socket could not be opened or failed mid-flight
    #[error("Transport error: {0}")]
    Transport(#[source] Box<tungstenite::Error>),

    /// A frame could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An outbound payload could not be serialized
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Already connected")]
    AlreadyConnected,

    /// The socket went away before the frame could be written
    #[error("Not connected")]
    NotConnected,
}

impl From<tungstenite::Error> for GatewayError {
    fn from(error: tungstenite::Error) -> Self {
        Self::Transport(Box::new(error))
    }
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;
