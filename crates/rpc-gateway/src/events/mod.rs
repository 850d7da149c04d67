//! Gateway events
//!
//! Dispatch (op 0) events received from the gateway.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{DispatchEvent, ReadyEvent, ReadyUser};
