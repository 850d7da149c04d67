//! Op code handlers
//!
//! Handles decoded server frames in arrival order.

mod dispatch;
mod error;
mod heartbeat;
mod hello;
mod identify;
mod presence;
mod resume;
mod session;

pub use dispatch::DispatchHandler;
pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use hello::HelloHandler;
pub use identify::IdentifyHandler;
pub use presence::PresenceHandler;
pub use resume::ResumeHandler;
pub use session::SessionHandler;

use crate::client::GatewayContext;
use crate::protocol::{InboundFrame, ServerEvent};
use std::sync::Arc;

/// Routes decoded server frames to their handlers
pub struct FrameDispatcher;

impl FrameDispatcher {
    /// Handle one inbound frame
    ///
    /// The sequence is recorded before the handler runs, so a Hello or
    /// heartbeat triggered by this frame already sees it.
    pub async fn dispatch(ctx: &Arc<GatewayContext>, frame: InboundFrame) -> HandlerResult<()> {
        if let Some(sequence) = frame.sequence {
            if ctx.session.write().observe_sequence(sequence) {
                tracing::trace!(seq = sequence, "Sequence advanced");
            }
        }

        tracing::trace!(op = %frame.event.op(), "Handling frame");

        match frame.event {
            ServerEvent::Hello(hello) => HelloHandler::handle(ctx, hello).await,
            ServerEvent::Ready { ready, event } => {
                DispatchHandler::ready(ctx, ready, event);
                Ok(())
            }
            ServerEvent::Dispatch(event) => {
                DispatchHandler::handle(ctx, event);
                Ok(())
            }
            ServerEvent::HeartbeatRequest => HeartbeatHandler::beat(ctx).await,
            ServerEvent::HeartbeatAck => {
                HeartbeatHandler::ack(ctx);
                Ok(())
            }
            ServerEvent::Reconnect => {
                SessionHandler::reconnect(ctx).await;
                Ok(())
            }
            ServerEvent::InvalidSession { resumable } => {
                SessionHandler::invalid_session(ctx, resumable).await
            }
        }
    }
}
