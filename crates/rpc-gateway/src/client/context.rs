//! Shared connection context
//!
//! One per [`GatewayConnection`](super::GatewayConnection). The receive loop
//! is the only writer of the session; heartbeats and presence publication
//! only read it.

use super::ReconnectPolicy;
use crate::connection::{ConnectionState, HeartbeatScheduler, OutboundSender, SessionState};
use crate::events::DispatchEvent;
use parking_lot::{Mutex, RwLock};
use rpc_common::{GatewayConfig, Logger};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, watch, Notify};
use tokio_util::sync::CancellationToken;

/// Tag for lifecycle messages sent to the injected [`Logger`]
pub const LOG_TAG: &str = "Gateway";

/// Capacity of the dispatch event channel
const EVENT_BUFFER_SIZE: usize = 256;

/// Everything the receive loop, the heartbeat and the public handle share
pub struct GatewayContext {
    pub config: GatewayConfig,
    pub logger: Arc<dyn Logger>,
    pub session: RwLock<SessionState>,
    pub sender: OutboundSender,
    pub heartbeat: HeartbeatScheduler,
    /// Woken whenever a session becomes usable (READY or RESUMED)
    pub handshake: Notify,
    pub reconnect: ReconnectPolicy,
    state: watch::Sender<ConnectionState>,
    events: broadcast::Sender<DispatchEvent>,
    /// Cancellation scope of the current socket
    scope: Mutex<CancellationToken>,
    /// Close code chosen locally, takes precedence over the peer's echo
    pending_close: Mutex<Option<u16>>,
    heartbeat_sent: Mutex<Option<Instant>>,
    latency: Mutex<Option<Duration>>,
}

impl GatewayContext {
    pub fn new(config: GatewayConfig, logger: Arc<dyn Logger>) -> Self {
        let reconnect = ReconnectPolicy::new(config.reconnect_delay());
        let (state, _) = watch::channel(ConnectionState::Idle);
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);

        Self {
            config,
            logger,
            session: RwLock::new(SessionState::new()),
            sender: OutboundSender::new(),
            heartbeat: HeartbeatScheduler::new(),
            handshake: Notify::new(),
            reconnect,
            state,
            events,
            scope: Mutex::new(CancellationToken::new()),
            pending_close: Mutex::new(None),
            heartbeat_sent: Mutex::new(None),
            latency: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn set_state(&self, next: ConnectionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            tracing::debug!(from = %previous, to = %next, "Connection state changed");
        }
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DispatchEvent> {
        self.events.subscribe()
    }

    /// Forward a dispatch to subscribers, if any
    pub fn publish_event(&self, event: DispatchEvent) {
        let _ = self.events.send(event);
    }

    /// Scope of the current socket
    pub fn scope(&self) -> CancellationToken {
        self.scope.lock().clone()
    }

    /// Cancel the current scope and start a new one for the next socket
    pub fn renew_scope(&self) -> CancellationToken {
        let next = CancellationToken::new();
        let previous = std::mem::replace(&mut *self.scope.lock(), next.clone());
        previous.cancel();
        next
    }

    /// Hand over from `current` to a new scope, unless `current` was
    /// cancelled by a close in the meantime
    pub fn renew_scope_from(&self, current: &CancellationToken) -> Option<CancellationToken> {
        let mut scope = self.scope.lock();
        if current.is_cancelled() {
            return None;
        }
        let next = CancellationToken::new();
        std::mem::replace(&mut *scope, next.clone()).cancel();
        Some(next)
    }

    pub fn request_close(&self, code: u16) {
        *self.pending_close.lock() = Some(code);
    }

    pub fn take_pending_close(&self) -> Option<u16> {
        self.pending_close.lock().take()
    }

    /// Handshake complete and the socket is still open
    pub fn is_ready(&self) -> bool {
        self.session.read().is_connected() && self.sender.is_open()
    }

    pub fn record_heartbeat_sent(&self) {
        *self.heartbeat_sent.lock() = Some(Instant::now());
    }

    /// Returns the round trip of the acknowledged heartbeat
    pub fn record_heartbeat_ack(&self) -> Option<Duration> {
        let sent = self.heartbeat_sent.lock().take()?;
        let latency = sent.elapsed();
        *self.latency.lock() = Some(latency);
        Some(latency)
    }

    pub fn latency(&self) -> Option<Duration> {
        *self.latency.lock()
    }

    /// Tear down the socket and forget the session
    ///
    /// Cancels the receive loop and heartbeat together. Idempotent.
    pub async fn shutdown(&self) {
        self.scope.lock().cancel();
        self.heartbeat.stop();

        if self.sender.is_open() {
            self.set_state(ConnectionState::Closing);
        }
        self.sender.close(1000, "").await;
        self.sender.detach().await;

        self.session.write().reset();
        self.pending_close.lock().take();
        self.heartbeat_sent.lock().take();
        self.latency.lock().take();
        self.set_state(ConnectionState::Idle);

        self.logger.info(LOG_TAG, "Connection to gateway closed");
    }
}

impl std::fmt::Debug for GatewayContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayContext")
            .field("state", &self.state())
            .field("session", &*self.session.read())
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}
