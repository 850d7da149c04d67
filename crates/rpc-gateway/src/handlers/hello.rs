//! Hello (op 10)

use super::{HandlerResult, HeartbeatHandler, IdentifyHandler, ResumeHandler};
use crate::client::{GatewayContext, LOG_TAG};
use crate::connection::ConnectionState;
use crate::protocol::HelloPayload;
use std::sync::Arc;
use std::time::Duration;

/// Answers the handshake and starts heartbeating
pub struct HelloHandler;

impl HelloHandler {
    /// Resume when a session with at least one dispatch is stored, identify
    /// otherwise, then (re)start the heartbeat at the announced interval.
    pub async fn handle(ctx: &Arc<GatewayContext>, hello: HelloPayload) -> HandlerResult<()> {
        let interval_ms = hello.heartbeat_interval;
        ctx.logger.info(
            LOG_TAG,
            &format!("Received Hello (heartbeat interval {interval_ms} ms)"),
        );

        ctx.session.write().set_heartbeat_interval(interval_ms);

        let resume = ctx.session.read().resume_payload(&ctx.config.token);
        let sent = match resume {
            Some(payload) => ResumeHandler::send(ctx, &payload).await,
            None => IdentifyHandler::send(ctx).await,
        };
        if sent.is_ok() {
            ctx.set_state(ConnectionState::Authenticating);
        }

        // Heartbeats start even if the handshake frame was lost
        HeartbeatHandler::start(ctx, Duration::from_millis(interval_ms));
        sent
    }
}
