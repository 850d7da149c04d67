//! Session state
//!
//! Everything needed to resume a dropped connection. Owned by the gateway
//! connection and mutated only through the transitions below.

use crate::protocol::ResumePayload;

/// Resumable session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    sequence: u64,
    session_id: Option<String>,
    resume_url: Option<String>,
    heartbeat_interval_ms: u64,
    connected: bool,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last dispatch sequence observed, `0` before any
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn resume_url(&self) -> Option<&str> {
        self.resume_url.as_deref()
    }

    #[must_use]
    pub fn heartbeat_interval_ms(&self) -> u64 {
        self.heartbeat_interval_ms
    }

    /// Handshake completed (READY received) and not closed since
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record the sequence of a dispatch frame
    ///
    /// Never moves backwards. Returns whether the value changed.
    pub fn observe_sequence(&mut self, sequence: u64) -> bool {
        if sequence > self.sequence {
            self.sequence = sequence;
            true
        } else {
            false
        }
    }

    pub fn set_heartbeat_interval(&mut self, interval_ms: u64) {
        self.heartbeat_interval_ms = interval_ms;
    }

    /// READY: store the session identity and mark the handshake complete
    pub fn establish(&mut self, session_id: String, resume_url: String) {
        self.session_id = Some(session_id);
        self.resume_url = Some(resume_url);
        self.connected = true;
    }

    /// RESUMED: the stored session is live again on the new socket
    ///
    /// This is the one place besides READY that sets `connected`. A resumed
    /// session never receives another READY, and presence publication waits
    /// on `connected`, so it has to be restored here.
    pub fn mark_resumed(&mut self) {
        if self.session_id.is_some() {
            self.connected = true;
        }
    }

    /// Socket closed but the session may still be resumed
    pub fn suspend(&mut self) {
        self.connected = false;
    }

    /// Forget everything
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Resume is only attempted with a known session and at least one dispatch seen
    #[must_use]
    pub fn can_resume(&self) -> bool {
        self.sequence > 0 && self.session_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    /// Body for a Resume frame, if resuming is possible
    #[must_use]
    pub fn resume_payload(&self, token: &str) -> Option<ResumePayload> {
        if !self.can_resume() {
            return None;
        }
        self.session_id.as_ref().map(|session_id| ResumePayload {
            token: token.to_string(),
            session_id: session_id.clone(),
            seq: self.sequence,
        })
    }

    /// Heartbeat body: `None` (null on the wire) until a sequence is known
    #[must_use]
    pub fn heartbeat_sequence(&self) -> Option<u64> {
        (self.sequence > 0).then_some(self.sequence)
    }
}
