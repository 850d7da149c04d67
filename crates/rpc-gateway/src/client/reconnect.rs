//! Close code policy

use crate::protocol::CloseCode;
use std::time::Duration;

/// What to do after the socket closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Open a new socket after `delay`, keeping the session for a Resume
    Resume { delay: Duration },
    /// Reset everything, no retry
    Terminate,
}

/// Decides between resuming and terminating from the close code
///
/// Only [`CloseCode::Reconnect`] (4000) is resumable. Every other code,
/// and a closure without any code, terminates the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    delay: Duration,
}

impl ReconnectPolicy {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn decide(&self, code: Option<u16>) -> CloseAction {
        match code.and_then(CloseCode::from_u16) {
            Some(close) if close.can_resume() => CloseAction::Resume { delay: self.delay },
            _ => CloseAction::Terminate,
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
