//! Errors surfaced by extraction, export and bulk download.
//!
//! Each variant renders as a message that can be shown to a user as-is.
//! Nothing here is retried internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Please enter a valid Wistia video ID or URL")]
    Input,

    #[error("Failed to fetch video data (HTTP {status}). Please check the video ID.")]
    Http { status: u16 },

    #[error("Failed to reach the video host: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Could not find video data in response. The video might be private or the ID might be incorrect.")]
    PayloadNotFound,

    #[error("Invalid response format. Please check the video ID.")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("No assets found for this video.")]
    EmptyAssets,

    #[error("No data to export. Please extract assets first.")]
    NoData,

    #[error("No assets selected. Please select assets to download.")]
    NothingSelected,

    #[error("An extraction is already in progress")]
    Busy,

    #[error("Unknown export format: {0} (expected csv or json)")]
    UnknownFormat(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("File system error: {0}")]
    Io(String),
}
