//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: GatewayConfig,
    pub presence: PresenceConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Gateway client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base websocket URL, without the version/encoding query
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Account token sent in Identify and Resume
    pub token: String,
    /// Client metadata reported in Identify
    #[serde(default = "default_os")]
    pub os: String,
    #[serde(default = "default_browser")]
    pub browser: String,
    #[serde(default = "default_device")]
    pub device: String,
    /// Delay before reconnecting after a resumable close
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Delay before re-identifying after an Invalid Session
    #[serde(default = "default_invalid_session_delay_ms")]
    pub invalid_session_delay_ms: u64,
}

impl GatewayConfig {
    /// Query suffix selecting protocol version 10 with JSON encoding
    pub const QUERY: &'static str = "/?v=10&encoding=json";

    /// Create a configuration for `token` against the public gateway
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            url: default_gateway_url(),
            token: token.into(),
            os: default_os(),
            browser: default_browser(),
            device: default_device(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            invalid_session_delay_ms: default_invalid_session_delay_ms(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Full endpoint for a fresh connection
    #[must_use]
    pub fn endpoint(&self) -> String {
        Self::with_query(&self.url)
    }

    /// Append the version/encoding query to a base URL
    #[must_use]
    pub fn with_query(base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), Self::QUERY)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    #[must_use]
    pub fn invalid_session_delay(&self) -> Duration {
        Duration::from_millis(self.invalid_session_delay_ms)
    }
}

/// Presence published by the command-line client
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub large_image: Option<String>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            status: default_status(),
            activity_name: None,
            details: None,
            state: None,
            large_image: None,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "rpc-gateway".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg".to_string()
}

fn default_os() -> String {
    "Windows".to_string()
}

fn default_browser() -> String {
    "Discord Client".to_string()
}

fn default_device() -> String {
    "rpc-gateway".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    200
}

fn default_invalid_session_delay_ms() -> u64 {
    150
}

fn default_status() -> String {
    "online".to_string()
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `GATEWAY_TOKEN` is missing or a numeric variable does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: optional_var("APP_NAME").unwrap_or_else(default_app_name),
                env: optional_var("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            gateway: GatewayConfig {
                url: optional_var("GATEWAY_URL").unwrap_or_else(default_gateway_url),
                token: optional_var("GATEWAY_TOKEN").ok_or(ConfigError::MissingVar("GATEWAY_TOKEN"))?,
                os: optional_var("GATEWAY_OS").unwrap_or_else(default_os),
                browser: optional_var("GATEWAY_BROWSER").unwrap_or_else(default_browser),
                device: optional_var("GATEWAY_DEVICE").unwrap_or_else(default_device),
                reconnect_delay_ms: parse_var(
                    "GATEWAY_RECONNECT_DELAY_MS",
                    default_reconnect_delay_ms(),
                )?,
                invalid_session_delay_ms: parse_var(
                    "GATEWAY_INVALID_SESSION_DELAY_MS",
                    default_invalid_session_delay_ms(),
                )?,
            },
            presence: PresenceConfig {
                status: optional_var("PRESENCE_STATUS").unwrap_or_else(default_status),
                activity_name: optional_var("PRESENCE_NAME"),
                details: optional_var("PRESENCE_DETAILS"),
                state: optional_var("PRESENCE_STATE"),
                large_image: optional_var("PRESENCE_LARGE_IMAGE"),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
