//! Gateway protocol definitions
//!
//! Defines the wire format: op codes, close codes, the frame envelope and
//! the typed payloads carried by each op code.

mod close_codes;
mod decode;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use decode::{DecodeError, InboundFrame, ServerEvent};
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties, ResumePayload};
