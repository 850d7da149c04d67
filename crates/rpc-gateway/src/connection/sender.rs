//! Outbound frame writer
//!
//! The only path that writes to the socket. Writes are serialized by an
//! async mutex around the sink half; when no socket is attached every send
//! is a silent no-op.

use crate::protocol::{GatewayMessage, OpCode};
use futures::{Sink, SinkExt};
use serde::Serialize;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

/// Write half of a websocket
pub type FrameSink = Pin<Box<dyn Sink<Message, Error = WsError> + Send>>;

/// Serializes payloads and writes them to the active socket
pub struct OutboundSender {
    sink: Mutex<Option<FrameSink>>,
    open: AtomicBool,
}

impl OutboundSender {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Mutex::new(None),
            open: AtomicBool::new(false),
        }
    }

    /// Bind to a freshly opened socket
    pub async fn attach(&self, sink: FrameSink) {
        *self.sink.lock().await = Some(sink);
        self.open.store(true, Ordering::SeqCst);
    }

    /// A socket is attached and no close frame has been written to it
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Send `{op, d: body}`
    ///
    /// Returns whether the frame was written. Failures are logged, never raised.
    pub async fn send<T: Serialize + ?Sized>(&self, op: OpCode, body: &T) -> bool {
        match GatewayMessage::with_body(op, body) {
            Ok(message) => self.send_message(&message).await,
            Err(e) => {
                tracing::warn!(op = %op, error = %e, "Failed to serialize payload");
                false
            }
        }
    }

    /// Send a prepared frame
    pub async fn send_message(&self, message: &GatewayMessage) -> bool {
        if !self.is_open() {
            tracing::trace!(op = %message.op, "Socket inactive, frame dropped");
            return false;
        }

        let json = match message.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(op = %message.op, error = %e, "Failed to serialize frame");
                return false;
            }
        };

        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            return false;
        };

        match sink.send(Message::Text(json.into())).await {
            Ok(()) => {
                tracing::trace!(op = %message.op, "Frame sent");
                true
            }
            Err(e) => {
                tracing::warn!(op = %message.op, error = %e, "Failed to send frame");
                false
            }
        }
    }

    /// Start the close handshake with `code`
    ///
    /// The sink stays attached so the peer's close reply can still be
    /// flushed; every later send is a no-op.
    pub async fn close(&self, code: u16, reason: &str) -> bool {
        if !self.open.swap(false, Ordering::SeqCst) {
            return false;
        }

        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            return false;
        };

        let frame = CloseFrame {
            code: WsCloseCode::from(code),
            reason: reason.to_string().into(),
        };

        match sink.send(Message::Close(Some(frame))).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(close_code = code, error = %e, "Failed to send close frame");
                false
            }
        }
    }

    /// Release the socket
    pub async fn detach(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.sink.lock().await.take();
    }
}

impl Default for OutboundSender {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutboundSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundSender")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
