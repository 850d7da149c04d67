//! Connection lifecycle state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the connection is in its lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No socket, nothing scheduled
    #[default]
    Idle,
    /// Opening the socket
    Connecting,
    /// Socket open, waiting for Hello
    AwaitingHello,
    /// Identify or Resume sent, waiting for READY/RESUMED
    Authenticating,
    /// Handshake complete
    Established,
    /// Tearing down
    Closing,
    /// Closed with a resumable code, about to reconnect
    Reconnecting,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_established(self) -> bool {
        matches!(self, Self::Established)
    }

    /// A socket is open or being opened
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::Connecting | Self::AwaitingHello | Self::Authenticating | Self::Established
        )
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Connecting => "Connecting",
            Self::AwaitingHello => "AwaitingHello",
            Self::Authenticating => "Authenticating",
            Self::Established => "Established",
            Self::Closing => "Closing",
            Self::Reconnecting => "Reconnecting",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
