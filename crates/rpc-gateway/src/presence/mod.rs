//! Presence payloads
//!
//! The body of a Presence Update (op 3). The gateway core forwards it as-is;
//! these types only give callers a checked way to build one.

mod activity;
mod assets;

pub use activity::{Activity, ActivityAssets, ActivityMetadata, ActivityTimestamps, ActivityType};
pub use assets::{external_asset_id, ImageRef};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Online status shown alongside the activities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Online,
    Idle,
    Dnd,
    Invisible,
    Offline,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Invisible => "invisible",
            Self::Offline => "offline",
        }
    }

    /// Parse a status name, case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "online" => Some(Self::Online),
            "idle" => Some(Self::Idle),
            "dnd" => Some(Self::Dnd),
            "invisible" => Some(Self::Invisible),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence Update body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    pub activities: Vec<Activity>,
    pub afk: bool,
    /// Unix time in milliseconds since the client went idle
    pub since: Option<u64>,
    pub status: Status,
}

impl Presence {
    #[must_use]
    pub fn new(status: Status) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    #[must_use]
    pub fn with_since(mut self, since: u64) -> Self {
        self.since = Some(since);
        self
    }

    #[must_use]
    pub fn afk(mut self, afk: bool) -> Self {
        self.afk = afk;
        self
    }
}

impl From<&rpc_common::PresenceConfig> for Presence {
    fn from(config: &rpc_common::PresenceConfig) -> Self {
        let status = Status::from_name(&config.status).unwrap_or_default();
        let mut presence = Self::new(status);

        if let Some(name) = &config.activity_name {
            let mut activity = Activity::new(name.clone(), ActivityType::Playing);
            activity.details.clone_from(&config.details);
            activity.state.clone_from(&config.state);
            match config.large_image.as_deref().and_then(ImageRef::parse) {
                Some(ImageRef::Gateway(id)) => {
                    activity.assets = Some(ActivityAssets::default().with_large_image(id));
                }
                Some(ImageRef::External(url)) => {
                    tracing::warn!(url = %url, "Large image is not a gateway asset, skipping it");
                }
                None => {}
            }
            presence = presence.with_activity(activity);
        }

        presence
    }
}
