//! Identify (op 2)

use super::{HandlerError, HandlerResult};
use crate::client::{GatewayContext, LOG_TAG};
use crate::protocol::{IdentifyPayload, IdentifyProperties, OpCode};

/// Starts a fresh session
pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Send an Identify built from the configured token and client metadata
    pub async fn send(ctx: &GatewayContext) -> HandlerResult<()> {
        let payload = IdentifyPayload::new(
            ctx.config.token.clone(),
            IdentifyProperties::from(&ctx.config),
        );

        ctx.logger.info(LOG_TAG, "Sending Identify");
        if ctx.sender.send(OpCode::Identify, &payload).await {
            Ok(())
        } else {
            Err(HandlerError::SendFailed(OpCode::Identify))
        }
    }
}
