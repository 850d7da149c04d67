//! Connection building blocks
//!
//! Session state, the outbound writer and the heartbeat scheduler shared by
//! the receive loop and the public client handle.

mod heartbeat;
mod sender;
mod session;
mod state;

pub use heartbeat::HeartbeatScheduler;
pub use sender::{FrameSink, OutboundSender};
pub use session::SessionState;
pub use state::ConnectionState;
