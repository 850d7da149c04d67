//! Gateway client
//!
//! [`GatewayConnection`] is the public handle. Cloning it is cheap; every
//! clone drives the same socket and session.
//!
//! # Example
//!
//! ```no_run
//! use rpc_common::GatewayConfig;
//! use rpc_gateway::{GatewayConnection, Presence, Status};
//!
//! # async fn run() -> rpc_gateway::GatewayResult<()> {
//! let gateway = GatewayConnection::new(GatewayConfig::new("token"));
//! gateway.connect().await?;
//! gateway.send_activity(&Presence::new(Status::Idle)).await?;
//! gateway.close().await;
//! # Ok(())
//! # }
//! ```

mod context;
mod handler;
mod reconnect;

pub use context::{GatewayContext, LOG_TAG};
pub use reconnect::{CloseAction, ReconnectPolicy};

use crate::connection::{ConnectionState, SessionState};
use crate::error::{GatewayError, GatewayResult};
use crate::events::DispatchEvent;
use crate::handlers::PresenceHandler;
use crate::presence::Presence;
use rpc_common::{GatewayConfig, Logger, TracingLogger};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Handle to one gateway session
#[derive(Debug, Clone)]
pub struct GatewayConnection {
    ctx: Arc<GatewayContext>,
}

impl GatewayConnection {
    /// Create a connection that logs through `tracing`
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_logger(config, Arc::new(TracingLogger))
    }

    pub fn with_logger(config: GatewayConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            ctx: Arc::new(GatewayContext::new(config, logger)),
        }
    }

    /// Open the socket and start the receive loop
    ///
    /// Returns once the socket is open; the handshake continues in the
    /// background. Only one `connect` may be outstanding at a time.
    pub async fn connect(&self) -> GatewayResult<()> {
        if self.ctx.sender.is_open() {
            return Err(GatewayError::AlreadyConnected);
        }
        let scope = self.ctx.renew_scope();
        handler::open(Arc::clone(&self.ctx), scope).await
    }

    /// Close the socket, stop every background task and forget the session
    pub async fn close(&self) {
        self.ctx.shutdown().await;
    }

    /// Publish a presence update
    ///
    /// Waits until READY has been handled and the socket is open, then
    /// sends exactly one presence frame.
    pub async fn send_activity(&self, presence: &Presence) -> GatewayResult<()> {
        let message = PresenceHandler::encode(presence)?;
        PresenceHandler::wait_until_ready(&self.ctx).await;
        PresenceHandler::publish(&self.ctx, &message)
            .await
            .map_err(|_| GatewayError::NotConnected)
    }

    /// The socket is open, whether or not the handshake completed
    pub fn is_connected(&self) -> bool {
        self.ctx.sender.is_open()
    }

    /// The handshake completed and the socket is open
    pub fn is_ready(&self) -> bool {
        self.ctx.is_ready()
    }

    /// Snapshot of the session state
    pub fn session(&self) -> SessionState {
        self.ctx.session.read().clone()
    }

    pub fn state(&self) -> ConnectionState {
        self.ctx.state()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.ctx.subscribe_state()
    }

    /// Every dispatch event after the client handled it
    pub fn subscribe_events(&self) -> broadcast::Receiver<DispatchEvent> {
        self.ctx.subscribe_events()
    }

    /// Round trip of the last acknowledged heartbeat
    pub fn latency(&self) -> Option<Duration> {
        self.ctx.latency()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.ctx.config
    }
}
