//! Handler error types

use crate::protocol::OpCode;
use thiserror::Error;

/// Handler error type
///
/// Never fatal: the receive loop logs it and moves on to the next frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandlerError {
    /// The outbound frame could not be written
    #[error("Failed to send {0} frame")]
    SendFailed(OpCode),

    /// The connection scope was cancelled while the handler was waiting
    #[error("Connection closed while handling frame")]
    Cancelled,
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
