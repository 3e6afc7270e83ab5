//! Asset records produced by normalization.
//!
//! A record is one downloadable rendition of a video (original upload,
//! transcoded mp4s, still images, storyboards, ...).

use serde::{Deserialize, Serialize};

/// A raw asset dictionary exactly as the embed payload returned it.
pub type RawAsset = serde_json::Map<String, serde_json::Value>;

/// Default type tag when the payload omits one
pub const DEFAULT_ASSET_TYPE: &str = "video";

/// One normalized, ordinal-indexed asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// `asset_<ordinal>`, unique within one load
    pub id: String,

    /// Human-readable name (`Asset <ordinal + 1>` when missing)
    pub display_name: String,

    /// Size in bytes, 0 if unknown
    pub size: u64,

    /// Pixel width, if known
    pub width: Option<u64>,

    /// Pixel height, if known
    pub height: Option<u64>,

    /// Download URL with any `.bin` suffix corrected
    pub url: Option<String>,

    /// File extension
    pub ext: String,

    /// Wistia asset type tag (`original`, `hd_mp4_video`, `still_image`, ...)
    #[serde(rename = "type")]
    pub asset_type: String,
}

impl AssetRecord {
    /// Build the stable id for a position in the raw asset list
    pub fn id_for(ordinal: usize) -> String {
        format!("asset_{}", ordinal)
    }

    /// Pixel area used when sorting by dimensions; a missing side counts as 0
    pub fn area(&self) -> u64 {
        self.width.unwrap_or(0).saturating_mul(self.height.unwrap_or(0))
    }

    /// `W × H` when both dimensions are known
    pub fn dimensions(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{} × {}", w, h)),
            _ => None,
        }
    }

    /// Case-insensitive substring match against name, url and extension.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.display_name.to_lowercase().contains(needle)
            || self
                .url
                .as_deref()
                .is_some_and(|url| url.to_lowercase().contains(needle))
            || self.ext.to_lowercase().contains(needle)
    }
}

/// Render a byte count the way the asset table shows it
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "N/A".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
