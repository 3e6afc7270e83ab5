//! Turn raw payload assets into ordered [`AssetRecord`]s.
//!
//! Wistia serves most renditions with a `.bin` suffix; the extension is
//! restored from the asset's `ext`, or from its type when `ext` is missing.

use serde_json::Value;

use crate::domain::{AssetRecord, RawAsset, DEFAULT_ASSET_TYPE};

/// Extension for an asset type tag
pub fn extension_for_type(asset_type: Option<&str>) -> &'static str {
    match asset_type {
        Some("original" | "iphone_video" | "mp4_video" | "md_mp4_video" | "hd_mp4_video") => "mp4",
        Some("still_image" | "storyboard") => "jpg",
        _ => "mp4",
    }
}

/// Correct a download URL's `.bin` suffix.
///
/// URLs with any other suffix are returned unchanged.
pub fn process_url(url: Option<&str>, ext: Option<&str>, asset_type: Option<&str>) -> Option<String> {
    let url = url.filter(|u| !u.is_empty())?;
    let extension = ext
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| extension_for_type(asset_type));

    match url.strip_suffix(".bin") {
        Some(stem) => Some(format!("{}.{}", stem, extension)),
        None => Some(url.to_string()),
    }
}

/// Normalize one raw asset found at `ordinal` in the payload
pub fn normalize_asset(ordinal: usize, raw: &RawAsset) -> AssetRecord {
    let url = string_field(raw, "url");
    let ext = string_field(raw, "ext");
    let asset_type = string_field(raw, "type");

    AssetRecord {
        id: AssetRecord::id_for(ordinal),
        display_name: string_field(raw, "display_name")
            .map(str::to_string)
            .unwrap_or_else(|| format!("Asset {}", ordinal + 1)),
        size: raw.get("size").and_then(byte_count).unwrap_or(0),
        width: raw.get("width").and_then(dimension),
        height: raw.get("height").and_then(dimension),
        url: process_url(url, ext, asset_type),
        ext: ext
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| extension_for_type(asset_type))
            .to_string(),
        asset_type: asset_type.unwrap_or(DEFAULT_ASSET_TYPE).to_string(),
    }
}

/// Normalize a whole payload, preserving server order
pub fn normalize(raw_assets: &[RawAsset]) -> Vec<AssetRecord> {
    raw_assets
        .iter()
        .enumerate()
        .map(|(ordinal, raw)| normalize_asset(ordinal, raw))
        .collect()
}

fn string_field<'a>(raw: &'a RawAsset, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// Non-negative integer; fractional byte counts are truncated
fn byte_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

/// Positive integer pixel dimension
fn dimension(value: &Value) -> Option<u64> {
    byte_count(value).filter(|d| *d > 0)
}
