//! Server frame fixtures
//!
//! Raw JSON as the gateway puts it on the wire.

use serde_json::{json, Value};

/// Heartbeat interval short enough to observe several ticks in a test
pub const FAST_HEARTBEAT_MS: u64 = 100;

/// Heartbeat interval that never ticks twice during a test
pub const SLOW_HEARTBEAT_MS: u64 = 41_250;

pub fn hello(heartbeat_interval: u64) -> Value {
    json!({"op": 10, "d": {"heartbeat_interval": heartbeat_interval}})
}

pub fn ready(session_id: &str, resume_gateway_url: &str, seq: u64) -> Value {
    json!({
        "op": 0,
        "s": seq,
        "t": "READY",
        "d": {
            "v": 10,
            "session_id": session_id,
            "resume_gateway_url": resume_gateway_url,
            "user": {"id": "80351110224678912", "username": "quokka"}
        }
    })
}

pub fn resumed(seq: u64) -> Value {
    json!({"op": 0, "s": seq, "t": "RESUMED", "d": null})
}

pub fn dispatch(name: &str, seq: u64, data: Value) -> Value {
    json!({"op": 0, "s": seq, "t": name, "d": data})
}

pub fn heartbeat_request() -> Value {
    json!({"op": 1, "d": null})
}

pub fn heartbeat_ack() -> Value {
    json!({"op": 11})
}

pub fn reconnect() -> Value {
    json!({"op": 7, "d": null})
}

pub fn invalid_session(resumable: bool) -> Value {
    json!({"op": 9, "d": resumable})
}
