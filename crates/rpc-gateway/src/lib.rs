//! # rpc-gateway
//!
//! Client for a real-time gateway: handshake, heartbeats, sequence
//! tracking, session resume and presence publishing over one websocket.

mod client;
pub mod connection;
pub mod error;
pub mod events;
mod handlers;
pub mod presence;
pub mod protocol;

pub use client::{CloseAction, GatewayConnection, ReconnectPolicy};
pub use connection::{ConnectionState, SessionState};
pub use error::{GatewayError, GatewayResult};
pub use events::{DispatchEvent, GatewayEventType, ReadyEvent};
pub use presence::{Activity, ActivityAssets, ActivityType, ImageRef, Presence, Status};
