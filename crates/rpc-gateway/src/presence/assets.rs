//! Image identifiers accepted in activity assets
//!
//! The gateway accepts either an asset it already knows about
//! (`attachments/...`, `external/...`, or an `mp:` reference) or, after the
//! caller has resolved it, an external URL proxied through `mp:`.
//! Uploading and resolving images is left to the caller.

/// Prefix marking a media-proxy reference
pub const MEDIA_PROXY_PREFIX: &str = "mp:";

/// Where an image reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Already usable by the gateway
    Gateway(String),
    /// Arbitrary URL that must be resolved into an external asset first
    External(String),
}

impl ImageRef {
    /// Classify an image string; blank input means no image
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if raw.starts_with("attachments")
            || raw.starts_with("external")
            || raw.starts_with(MEDIA_PROXY_PREFIX)
        {
            Some(Self::Gateway(raw.to_string()))
        } else {
            Some(Self::External(raw.to_string()))
        }
    }

    /// Identifier to put in an activity asset field
    ///
    /// External URLs are passed through unchanged; resolve them with
    /// [`external_asset_id`] once the remote asset path is known.
    #[must_use]
    pub fn asset_id(&self) -> String {
        match self {
            Self::Gateway(id) | Self::External(id) => id.clone(),
        }
    }

    #[must_use]
    pub fn needs_resolution(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// Turn a resolved external asset path into an asset identifier
#[must_use]
pub fn external_asset_id(asset_path: &str) -> String {
    if asset_path.starts_with(MEDIA_PROXY_PREFIX) {
        asset_path.to_string()
    } else {
        format!("{MEDIA_PROXY_PREFIX}{asset_path}")
    }
}
