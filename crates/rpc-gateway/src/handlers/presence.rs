//! Presence Update (op 3)

use super::{HandlerError, HandlerResult};
use crate::client::{GatewayContext, LOG_TAG};
use crate::presence::Presence;
use crate::protocol::{GatewayMessage, OpCode};

/// Publishes presence once the session is ready
pub struct PresenceHandler;

impl PresenceHandler {
    pub fn encode(presence: &Presence) -> Result<GatewayMessage, serde_json::Error> {
        GatewayMessage::with_body(OpCode::PresenceUpdate, presence)
    }

    /// Park until READY has been handled and the socket is open
    pub async fn wait_until_ready(ctx: &GatewayContext) {
        loop {
            let notified = ctx.handshake.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if ctx.is_ready() {
                return;
            }
            notified.await;
        }
    }

    pub async fn publish(ctx: &GatewayContext, message: &GatewayMessage) -> HandlerResult<()> {
        ctx.logger.info(LOG_TAG, "Sending presence update");
        if ctx.sender.send_message(message).await {
            Ok(())
        } else {
            Err(HandlerError::SendFailed(OpCode::PresenceUpdate))
        }
    }
}
