//! Gateway frame envelope
//!
//! Every text frame, in either direction, is a JSON object
//! `{op, d, s, t}`. `s` and `t` are only present on dispatches.

use super::{HelloPayload, OpCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Op-specific body; always written, `null` when empty
    #[serde(default)]
    pub d: Value,

    /// Sequence number (dispatch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event name (dispatch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayMessage {
    /// Build an outbound frame `{op, d}`
    #[must_use]
    pub fn new(op: OpCode, d: Value) -> Self {
        Self { op, d, s: None, t: None }
    }

    /// Build an outbound frame from any serializable body
    pub fn with_body<T: Serialize + ?Sized>(op: OpCode, body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(op, serde_json::to_value(body)?))
    }

    /// Heartbeat carrying the last observed sequence, or `null` before any
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self::new(
            OpCode::Heartbeat,
            last_sequence.map_or(Value::Null, |s| Value::Number(s.into())),
        )
    }

    // === Server frames, used by mock gateways ===

    /// Dispatch (op 0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            d: data,
            s: Some(sequence),
            t: Some(event_type.into()),
        }
    }

    /// Hello (op 10)
    #[must_use]
    pub fn hello(heartbeat_interval: u64) -> Self {
        Self::new(
            OpCode::Hello,
            serde_json::to_value(HelloPayload { heartbeat_interval }).unwrap_or_default(),
        )
    }

    /// Heartbeat ACK (op 11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::new(OpCode::HeartbeatAck, Value::Null)
    }

    /// Reconnect (op 7)
    #[must_use]
    pub fn reconnect() -> Self {
        Self::new(OpCode::Reconnect, Value::Null)
    }

    /// Invalid Session (op 9)
    #[must_use]
    pub fn invalid_session(resumable: bool) -> Self {
        Self::new(OpCode::InvalidSession, Value::Bool(resumable))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GatewayMessage(op={}", self.op)?;
        if let Some(t) = &self.t {
            write!(f, ", t={t}")?;
        }
        if let Some(s) = self.s {
            write!(f, ", s={s}")?;
        }
        write!(f, ")")
    }
}
