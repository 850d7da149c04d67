//! Heartbeat (op 1) and Heartbeat ACK (op 11)

use super::{HandlerError, HandlerResult};
use crate::client::GatewayContext;
use crate::protocol::{GatewayMessage, OpCode};
use std::sync::Arc;
use std::time::Duration;

/// Sends heartbeats and tracks their acknowledgement
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Send one heartbeat carrying the last sequence (`null` before any)
    ///
    /// Used by the periodic producer and for server heartbeat requests.
    pub async fn beat(ctx: &GatewayContext) -> HandlerResult<()> {
        let sequence = ctx.session.read().heartbeat_sequence();
        ctx.record_heartbeat_sent();

        if ctx.sender.send_message(&GatewayMessage::heartbeat(sequence)).await {
            tracing::trace!(seq = ?sequence, "Heartbeat sent");
            Ok(())
        } else {
            Err(HandlerError::SendFailed(OpCode::Heartbeat))
        }
    }

    pub fn ack(ctx: &GatewayContext) {
        let latency = ctx.record_heartbeat_ack();
        tracing::trace!(latency_ms = ?latency.map(|l| l.as_millis()), "Heartbeat acknowledged");
    }

    /// Replace the running producer with one ticking every `period`
    pub fn start(ctx: &Arc<GatewayContext>, period: Duration) {
        let weak = Arc::downgrade(ctx);
        let scope = ctx.scope();

        ctx.heartbeat.start(period, &scope, move || {
            let ctx = weak.upgrade();
            async move {
                let Some(ctx) = ctx else { return };
                if let Err(e) = Self::beat(&ctx).await {
                    tracing::debug!(error = %e, "Periodic heartbeat skipped");
                }
            }
        });
    }
}
