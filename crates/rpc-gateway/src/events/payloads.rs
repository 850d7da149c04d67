//! Event payload definitions

use super::GatewayEventType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// READY event payload
///
/// Only the fields the client needs are typed; the rest stay in the raw
/// [`DispatchEvent`] data forwarded to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Session ID for resuming
    pub session_id: String,

    /// Gateway URL to use when resuming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_gateway_url: Option<String>,

    /// Current user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ReadyUser>,
}

/// Account the session was identified as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// A dispatch as forwarded to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub event_type: GatewayEventType,
    pub sequence: Option<u64>,
    pub data: Value,
}

impl DispatchEvent {
    #[must_use]
    pub fn new(event_type: GatewayEventType, sequence: Option<u64>, data: Value) -> Self {
        Self {
            event_type,
            sequence,
            data,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.event_type.as_str()
    }
}
