//! Gateway event types
//!
//! Classifies the `t` field of dispatch frames. The client core acts on
//! `READY` and `RESUMED`; everything else is forwarded to subscribers untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Gateway event types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    /// Sent after a successful Identify
    Ready,
    /// Sent after a successful Resume
    Resumed,
    /// Any other dispatch, by its raw name
    Other(String),
}

impl GatewayEventType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::Other(name) => name,
        }
    }

    /// Classify an event name
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "READY" => Self::Ready,
            "RESUMED" => Self::Resumed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the core handles this event itself
    #[must_use]
    pub fn is_session_event(&self) -> bool {
        matches!(self, Self::Ready | Self::Resumed)
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GatewayEventType> for String {
    fn from(event: GatewayEventType) -> Self {
        match event {
            GatewayEventType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl Serialize for GatewayEventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GatewayEventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}
