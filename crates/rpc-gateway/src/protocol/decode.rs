//! Typed decoding of inbound frames
//!
//! Turns a raw [`GatewayMessage`] into one [`ServerEvent`] variant per op
//! code, each with its own schema. Anything that does not fit is a
//! [`DecodeError`] and the frame is dropped by the receive loop.

use super::{GatewayMessage, HelloPayload, OpCode};
use crate::events::{DispatchEvent, GatewayEventType, ReadyEvent};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why an inbound frame could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, or not a valid envelope (including unknown op codes)
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An op code the server never sends
    #[error("unexpected client op code {0}")]
    UnexpectedOpcode(OpCode),

    /// The `d` field does not match the op code's schema
    #[error("invalid {op} body: {reason}")]
    InvalidBody { op: OpCode, reason: String },

    /// A dispatch without an event name
    #[error("dispatch without event name")]
    MissingEventName,
}

impl DecodeError {
    fn body(op: OpCode, reason: impl std::fmt::Display) -> Self {
        Self::InvalidBody {
            op,
            reason: reason.to_string(),
        }
    }
}

/// A decoded server frame
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// READY dispatch with its session details
    Ready { ready: ReadyEvent, event: DispatchEvent },
    /// Any other dispatch, RESUMED included
    Dispatch(DispatchEvent),
    /// The server wants a heartbeat right now
    HeartbeatRequest,
    /// The server asks the client to reconnect and resume
    Reconnect,
    /// The session is no longer valid
    InvalidSession { resumable: bool },
    Hello(HelloPayload),
    HeartbeatAck,
}

impl ServerEvent {
    #[must_use]
    pub fn op(&self) -> OpCode {
        match self {
            Self::Ready { .. } | Self::Dispatch(_) => OpCode::Dispatch,
            Self::HeartbeatRequest => OpCode::Heartbeat,
            Self::Reconnect => OpCode::Reconnect,
            Self::InvalidSession { .. } => OpCode::InvalidSession,
            Self::Hello(_) => OpCode::Hello,
            Self::HeartbeatAck => OpCode::HeartbeatAck,
        }
    }
}

/// A decoded frame together with its sequence number
#[derive(Debug, Clone, PartialEq)]
pub struct InboundFrame {
    pub sequence: Option<u64>,
    pub event: ServerEvent,
}

impl InboundFrame {
    /// Decode a text frame
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        Self::try_from(GatewayMessage::from_json(text)?)
    }
}

impl TryFrom<GatewayMessage> for InboundFrame {
    type Error = DecodeError;

    fn try_from(message: GatewayMessage) -> Result<Self, Self::Error> {
        let GatewayMessage { op, d, s, t } = message;

        let event = match op {
            OpCode::Dispatch => {
                let name = t.ok_or(DecodeError::MissingEventName)?;
                let event_type = GatewayEventType::from_name(&name);
                if event_type == GatewayEventType::Ready {
                    let ready = ReadyEvent::deserialize(&d).map_err(|e| DecodeError::body(op, e))?;
                    ServerEvent::Ready {
                        ready,
                        event: DispatchEvent::new(event_type, s, d),
                    }
                } else {
                    ServerEvent::Dispatch(DispatchEvent::new(event_type, s, d))
                }
            }
            OpCode::Heartbeat => ServerEvent::HeartbeatRequest,
            OpCode::Reconnect => ServerEvent::Reconnect,
            OpCode::InvalidSession => ServerEvent::InvalidSession {
                resumable: matches!(d, Value::Bool(true)),
            },
            OpCode::Hello => {
                let hello: HelloPayload =
                    serde_json::from_value(d).map_err(|e| DecodeError::body(op, e))?;
                if hello.heartbeat_interval == 0 {
                    return Err(DecodeError::body(op, "heartbeat_interval must be positive"));
                }
                ServerEvent::Hello(hello)
            }
            OpCode::HeartbeatAck => ServerEvent::HeartbeatAck,
            OpCode::Identify | OpCode::PresenceUpdate | OpCode::Resume => {
                return Err(DecodeError::UnexpectedOpcode(op));
            }
        };

        Ok(Self { sequence: s, event })
    }
}
