//! Resume (op 6)

use super::{HandlerError, HandlerResult};
use crate::client::{GatewayContext, LOG_TAG};
use crate::protocol::{OpCode, ResumePayload};

/// Picks up a previous session where it left off
pub struct ResumeHandler;

impl ResumeHandler {
    pub async fn send(ctx: &GatewayContext, payload: &ResumePayload) -> HandlerResult<()> {
        ctx.logger.info(
            LOG_TAG,
            &format!(
                "Resuming session {} at sequence {}",
                payload.session_id, payload.seq
            ),
        );

        if ctx.sender.send(OpCode::Resume, payload).await {
            Ok(())
        } else {
            Err(HandlerError::SendFailed(OpCode::Resume))
        }
    }
}
