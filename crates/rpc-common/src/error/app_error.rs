//! Application error types
//!
//! Errors surfaced at the process edge (configuration, telemetry, gateway startup).

use crate::config::ConfigError;
use crate::telemetry::TracingError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TracingError),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::Telemetry(_) | Self::Internal(_) => 70,
            Self::Gateway(_) => 69,
        }
    }

    /// Create a gateway error from anything displayable
    #[must_use]
    pub fn gateway(err: impl fmt::Display) -> Self {
        Self::Gateway(err.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result alias using [`AppError`]
pub type AppResult<T> = Result<T, AppError>;
