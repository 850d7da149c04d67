//! Dispatch (op 0)

use crate::client::{GatewayContext, LOG_TAG};
use crate::connection::ConnectionState;
use crate::events::{DispatchEvent, GatewayEventType, ReadyEvent};
use rpc_common::GatewayConfig;

/// Routes dispatch events by name
pub struct DispatchHandler;

impl DispatchHandler {
    /// READY: store the session identity and release pending presence updates
    pub fn ready(ctx: &GatewayContext, ready: ReadyEvent, event: DispatchEvent) {
        let resume_url = ready
            .resume_gateway_url
            .as_deref()
            .map_or_else(|| ctx.config.endpoint(), GatewayConfig::with_query);

        match &ready.user {
            Some(user) => ctx.logger.info(
                LOG_TAG,
                &format!("Session {} ready as {}", ready.session_id, user.username),
            ),
            None => ctx
                .logger
                .info(LOG_TAG, &format!("Session {} ready", ready.session_id)),
        }

        ctx.session.write().establish(ready.session_id, resume_url);
        ctx.set_state(ConnectionState::Established);
        ctx.handshake.notify_waiters();

        ctx.publish_event(event);
    }

    /// Everything after READY; RESUMED restores the live session
    pub fn handle(ctx: &GatewayContext, event: DispatchEvent) {
        if event.event_type == GatewayEventType::Resumed {
            ctx.logger.info(LOG_TAG, "Session resumed");
            ctx.session.write().mark_resumed();
            ctx.set_state(ConnectionState::Established);
            ctx.handshake.notify_waiters();
        } else {
            tracing::trace!(event = %event.event_type, seq = ?event.sequence, "Dispatch received");
        }

        ctx.publish_event(event);
    }
}
