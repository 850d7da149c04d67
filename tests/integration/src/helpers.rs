//! Test helpers for integration tests
//!
//! [`MockGateway`] accepts websocket clients on a local port and hands each
//! socket to the test as a [`MockClient`], which records what the client
//! sends and lets the test push frames or close with a code.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rpc_common::{GatewayConfig, Logger};
use rpc_gateway::{ConnectionState, GatewayConnection};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

/// How long any single expectation may wait
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// In-process gateway server
pub struct MockGateway {
    addr: SocketAddr,
    clients: mpsc::UnboundedReceiver<MockClient>,
    held: mpsc::UnboundedReceiver<HeldConnection>,
    hold: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

impl MockGateway {
    /// Bind to an ephemeral port and start accepting
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, clients) = mpsc::unbounded_channel();
        let (held_tx, held) = mpsc::unbounded_channel();
        let hold = Arc::new(AtomicBool::new(false));
        let holding = Arc::clone(&hold);

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                if holding.load(Ordering::SeqCst) {
                    if held_tx.send(HeldConnection { stream }).is_err() {
                        break;
                    }
                    continue;
                }
                match MockClient::accept(stream).await {
                    Ok(client) => {
                        if tx.send(client).is_err() {
                            break;
                        }
                    }
                    Err(e) => eprintln!("mock gateway handshake failed: {e}"),
                }
            }
        });

        Ok(Self {
            addr,
            clients,
            held,
            hold,
            _handle: handle,
        })
    }

    /// Base URL, without the version query
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Wait for the next client to connect
    pub async fn next_client(&mut self) -> Result<MockClient> {
        tokio::time::timeout(RECV_TIMEOUT, self.clients.recv())
            .await
            .map_err(|_| anyhow!("no client connected"))?
            .ok_or_else(|| anyhow!("mock gateway stopped"))
    }

    /// Accept later TCP connections without answering the websocket handshake
    pub fn hold_handshakes(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Wait for the next connection parked by [`hold_handshakes`](Self::hold_handshakes)
    pub async fn next_held(&mut self) -> Result<HeldConnection> {
        tokio::time::timeout(RECV_TIMEOUT, self.held.recv())
            .await
            .map_err(|_| anyhow!("no connection held"))?
            .ok_or_else(|| anyhow!("mock gateway stopped"))
    }

    /// True if no client connects within `wait`
    pub async fn no_client_within(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.clients.recv()).await.is_err()
    }
}

/// TCP connection whose websocket handshake has not been answered yet
pub struct HeldConnection {
    stream: TcpStream,
}

impl HeldConnection {
    /// Answer the handshake now
    pub async fn complete(self) -> Result<MockClient> {
        MockClient::accept(self.stream).await
    }
}

/// One accepted client socket
pub struct MockClient {
    /// Request path and query the client connected with
    pub path: String,
    ws: WebSocketStream<TcpStream>,
}

impl MockClient {
    async fn accept(stream: TcpStream) -> Result<Self> {
        let mut path = String::new();
        let ws = accept_hdr_async(stream, |request: &Request, response: Response| {
            path = request.uri().to_string();
            Ok(response)
        })
        .await?;

        Ok(Self { path, ws })
    }

    pub async fn send(&mut self, frame: Value) -> Result<()> {
        self.ws.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Send a raw text frame, valid JSON or not
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.ws.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Next JSON frame from the client
    pub async fn recv(&mut self) -> Result<Value> {
        loop {
            let message = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .map_err(|_| anyhow!("timed out waiting for client frame"))?
                .ok_or_else(|| anyhow!("client disconnected"))??;

            match message {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(frame) => bail!("client closed: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Next frame with the given op code, skipping anything else
    pub async fn recv_op(&mut self, op: u64) -> Result<Value> {
        loop {
            let frame = self.recv().await?;
            if frame["op"] == op {
                return Ok(frame);
            }
        }
    }

    /// Every frame received during `window`
    pub async fn collect_for(&mut self, window: Duration) -> Result<Vec<Value>> {
        let deadline = tokio::time::Instant::now() + window;
        let mut frames = Vec::new();

        loop {
            match tokio::time::timeout_at(deadline, self.ws.next()).await {
                Err(_) => return Ok(frames),
                Ok(Some(Ok(Message::Text(text)))) => frames.push(serde_json::from_str(&text)?),
                Ok(Some(Ok(Message::Close(_)) | Err(_)) | None) => return Ok(frames),
                Ok(Some(Ok(_))) => {}
            }
        }
    }

    /// Wait for the client to close, returning its close code
    pub async fn recv_close(&mut self) -> Result<Option<u16>> {
        loop {
            let message = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .map_err(|_| anyhow!("timed out waiting for close"))?;

            match message {
                Some(Ok(Message::Close(frame))) => {
                    let code = frame.map(|f| u16::from(f.code));
                    self.drain().await;
                    return Ok(code);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => bail!("socket error before close: {e}"),
                None => return Ok(None),
            }
        }
    }

    /// Drop the TCP connection without a close handshake
    pub fn disconnect(self) {
        drop(self.ws);
    }

    /// Close the socket from the server side with `code`
    pub async fn close(&mut self, code: u16) -> Result<()> {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: "".into(),
        };
        self.ws.close(Some(frame)).await?;
        self.drain().await;
        Ok(())
    }

    /// Read until the close handshake finishes
    async fn drain(&mut self) {
        let _ = tokio::time::timeout(RECV_TIMEOUT, async {
            while let Some(Ok(_)) = self.ws.next().await {}
        })
        .await;
    }
}

/// Logger that keeps every message for assertions
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: &'static str,
    pub tag: String,
    pub message: String,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// True if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|e| e.message.contains(needle))
    }

    fn record(&self, level: &'static str, tag: &str, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            tag: tag.to_string(),
            message: message.to_string(),
        });
    }
}

impl Logger for RecordingLogger {
    fn info(&self, tag: &str, message: &str) {
        self.record("info", tag, message);
    }

    fn warn(&self, tag: &str, message: &str) {
        self.record("warn", tag, message);
    }

    fn debug(&self, tag: &str, message: &str) {
        self.record("debug", tag, message);
    }

    fn error(&self, tag: &str, message: &str) {
        self.record("error", tag, message);
    }
}

/// Gateway client pointed at `mock` with the default delays
pub fn test_client(mock: &MockGateway, logger: Arc<RecordingLogger>) -> GatewayConnection {
    let config = GatewayConfig::new("test-token").with_url(mock.url());
    GatewayConnection::with_logger(config, logger)
}

/// Wait until the client reaches `state`
pub async fn wait_for_state(gateway: &GatewayConnection, state: ConnectionState) -> Result<()> {
    let mut states = gateway.subscribe_state();
    tokio::time::timeout(RECV_TIMEOUT, states.wait_for(|current| *current == state))
        .await
        .map_err(|_| anyhow!("timed out waiting for {state}, still {}", gateway.state()))??;
    Ok(())
}
