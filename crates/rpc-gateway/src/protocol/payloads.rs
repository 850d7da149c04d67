//! Op code payload definitions

use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyPayload {
    pub token: String,
    pub capabilities: u32,
    pub compress: bool,
    pub large_threshold: u32,
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    pub const CAPABILITIES: u32 = 65;
    pub const LARGE_THRESHOLD: u32 = 100;

    #[must_use]
    pub fn new(token: impl Into<String>, properties: IdentifyProperties) -> Self {
        Self {
            token: token.into(),
            capabilities: Self::CAPABILITIES,
            compress: false,
            large_threshold: Self::LARGE_THRESHOLD,
            properties,
        }
    }
}

/// Client metadata reported in Identify
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

impl IdentifyProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    #[must_use]
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = browser.into();
        self
    }

    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }
}

impl From<&rpc_common::GatewayConfig> for IdentifyProperties {
    fn from(config: &rpc_common::GatewayConfig) -> Self {
        Self::new()
            .with_os(&config.os)
            .with_browser(&config.browser)
            .with_device(&config.device)
    }
}

/// Payload for op 6 (Resume)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePayload {
    pub token: String,
    pub session_id: String,
    /// Last sequence number received
    pub seq: u64,
}
