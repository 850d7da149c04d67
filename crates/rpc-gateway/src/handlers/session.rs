//! Reconnect (op 7) and Invalid Session (op 9)

use super::{HandlerError, HandlerResult, IdentifyHandler};
use crate::client::{GatewayContext, LOG_TAG};
use crate::protocol::CloseCode;

/// Server-driven session lifecycle requests
pub struct SessionHandler;

impl SessionHandler {
    /// Close the socket with 4000 so the close path resumes on a new socket
    pub async fn reconnect(ctx: &GatewayContext) {
        ctx.logger.info(LOG_TAG, "Server requested reconnect");
        ctx.request_close(CloseCode::Reconnect.into());
        ctx.sender
            .close(CloseCode::Reconnect.into(), "Attempting to reconnect")
            .await;
    }

    /// Wait, then start over with a fresh Identify
    ///
    /// The stored session is left untouched.
    pub async fn invalid_session(ctx: &GatewayContext, resumable: bool) -> HandlerResult<()> {
        ctx.logger.warn(
            LOG_TAG,
            &format!("Session invalidated (resumable: {resumable})"),
        );

        let scope = ctx.scope();
        tokio::select! {
            biased;
            () = scope.cancelled() => return Err(HandlerError::Cancelled),
            () = tokio::time::sleep(ctx.config.invalid_session_delay()) => {}
        }

        IdentifyHandler::send(ctx).await
    }
}
