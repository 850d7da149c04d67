//! Injectable logging capability
//!
//! The gateway reports lifecycle events (connect, handshake, close) through a
//! [`Logger`] so embedders can route them wherever they like. The default
//! implementation forwards to `tracing`; [`NoOpLogger`] discards everything.

/// Leveled logger taking a tag and a message
pub trait Logger: Send + Sync {
    fn info(&self, tag: &str, message: &str);
    fn warn(&self, tag: &str, message: &str);
    fn debug(&self, tag: &str, message: &str);
    fn error(&self, tag: &str, message: &str);
}

/// Logger that discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn info(&self, _tag: &str, _message: &str) {}
    fn warn(&self, _tag: &str, _message: &str) {}
    fn debug(&self, _tag: &str, _message: &str) {}
    fn error(&self, _tag: &str, _message: &str) {}
}

/// Logger backed by the global `tracing` subscriber
///
/// The tag is recorded as a structured `tag` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, tag: &str, message: &str) {
        tracing::info!(tag, "{message}");
    }

    fn warn(&self, tag: &str, message: &str) {
        tracing::warn!(tag, "{message}");
    }

    fn debug(&self, tag: &str, message: &str) {
        tracing::debug!(tag, "{message}");
    }

    fn error(&self, tag: &str, message: &str) {
        tracing::error!(tag, "{message}");
    }
}
