//! Socket lifecycle
//!
//! Opens sockets, runs the receive loop for each of them and applies the
//! close policy when one ends.

use super::{CloseAction, GatewayContext, LOG_TAG};
use crate::connection::ConnectionState;
use crate::error::GatewayResult;
use crate::handlers::FrameDispatcher;
use crate::protocol::InboundFrame;
use futures::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

type FrameSource = futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Open a socket to the resume URL if one is stored, else the default
/// endpoint, and spawn its receive loop under `scope`
///
/// A failed connect finalizes the connection like a terminal close. If
/// `scope` is cancelled before the socket is live, the socket is dropped
/// and nothing is revived.
pub fn open(ctx: Arc<GatewayContext>, scope: CancellationToken) -> BoxFuture<'static, GatewayResult<()>> {
    async move {
        let url = ctx
            .session
            .read()
            .resume_url()
            .map_or_else(|| ctx.config.endpoint(), str::to_string);

        ctx.set_state(ConnectionState::Connecting);
        ctx.logger.info(LOG_TAG, &format!("Connecting to {url}"));

        let connected = tokio::select! {
            biased;
            () = scope.cancelled() => {
                tracing::debug!(url = %url, "Connect abandoned, connection closed");
                return Ok(());
            }
            connected = connect_async(url.as_str()) => connected,
        };

        let stream = match connected {
            Ok((stream, _response)) => stream,
            Err(e) => {
                ctx.logger.error(LOG_TAG, &format!("Failed to connect: {e}"));
                ctx.shutdown().await;
                return Err(e.into());
            }
        };

        let (sink, source) = stream.split();
        ctx.sender.attach(Box::pin(sink)).await;
        ctx.set_state(ConnectionState::AwaitingHello);
        if scope.is_cancelled() {
            // close() ran while the socket was being attached
            ctx.sender.detach().await;
            ctx.set_state(ConnectionState::Idle);
            tracing::debug!(url = %url, "Socket dropped, connection closed");
            return Ok(());
        }
        tracing::debug!(url = %url, "Socket opened");

        tokio::spawn(receive_loop(Arc::clone(&ctx), source, scope));
        Ok(())
    }
    .boxed()
}

/// Handle frames strictly in arrival order until the socket ends
async fn receive_loop(ctx: Arc<GatewayContext>, mut source: FrameSource, scope: CancellationToken) {
    let mut remote_close = None;

    loop {
        let next = tokio::select! {
            biased;
            () = scope.cancelled() => {
                tracing::trace!("Receive loop cancelled");
                return;
            }
            next = source.next() => next,
        };

        match next {
            Some(Ok(Message::Text(text))) => match InboundFrame::parse(&text) {
                Ok(frame) => {
                    if let Err(e) = FrameDispatcher::dispatch(&ctx, frame).await {
                        tracing::debug!(error = %e, "Frame handling failed");
                    }
                }
                Err(e) => tracing::debug!(error = %e, "Dropping undecodable frame"),
            },
            Some(Ok(Message::Close(frame))) => {
                remote_close = frame.as_ref().map(|f| u16::from(f.code));
                tracing::debug!(close_code = ?remote_close, "Close frame received");
            }
            Some(Ok(_)) => tracing::trace!("Ignoring non-text frame"),
            Some(Err(e)) => {
                ctx.logger.error(LOG_TAG, &format!("Transport error: {e}"));
                break;
            }
            None => break,
        }
    }

    let code = ctx.take_pending_close().or(remote_close);
    handle_close(ctx, scope, code).await;
}

/// Resume after 4000, terminate on anything else
async fn handle_close(ctx: Arc<GatewayContext>, scope: CancellationToken, code: Option<u16>) {
    ctx.heartbeat.stop();
    ctx.sender.detach().await;
    ctx.session.write().suspend();
    ctx.set_state(ConnectionState::Closing);

    let action = ctx.reconnect.decide(code);
    let code_text = code.map_or_else(|| "none".to_string(), |c| c.to_string());
    ctx.logger.warn(
        LOG_TAG,
        &format!(
            "Closed with code: {code_text}, can_reconnect: {}",
            matches!(action, CloseAction::Resume { .. })
        ),
    );

    match action {
        CloseAction::Resume { delay } => {
            ctx.set_state(ConnectionState::Reconnecting);
            tokio::select! {
                biased;
                () = scope.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }

            let Some(next) = ctx.renew_scope_from(&scope) else {
                return;
            };
            ctx.logger.info(LOG_TAG, "Reconnecting to resume session");
            if let Err(e) = open(Arc::clone(&ctx), next).await {
                tracing::warn!(error = %e, "Reconnect failed");
            }
        }
        CloseAction::Terminate => ctx.shutdown().await,
    }
}
