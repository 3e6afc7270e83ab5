//! Wistia embed page adapter.
//!
//! The embed page for a video inlines its media document as the first
//! argument of an `iframeInit(...)` call. That markup is undocumented and
//! may change, so all knowledge of it is kept in [`parse_embed_payload`].

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::core::ExtractError;
use crate::domain::RawAsset;

use super::{AssetSource, HttpSettings};

/// Default embed endpoint
pub const DEFAULT_EMBED_BASE: &str = "https://fast.wistia.net/embed/iframe";

/// Build the embed page URL for a video id
pub fn embed_url(base: &str, video_id: &str) -> String {
    format!("{}/{}?videoFoam=true", base.trim_end_matches('/'), video_id)
}

/// The part of the media document we read
#[derive(Debug, Deserialize)]
struct MediaDocument {
    #[serde(default)]
    assets: Option<Vec<RawAsset>>,
}

fn payload_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"iframeInit\((.*?), \{\}").expect("valid payload pattern"))
}

/// Extract the raw asset list from an embed page body
pub fn parse_embed_payload(body: &str) -> Result<Vec<RawAsset>, ExtractError> {
    let json = payload_pattern()
        .captures(body)
        .and_then(|c| c.get(1))
        .ok_or(ExtractError::PayloadNotFound)?
        .as_str();

    let document: MediaDocument =
        serde_json::from_str(json).map_err(ExtractError::MalformedPayload)?;

    match document.assets {
        Some(assets) if !assets.is_empty() => Ok(assets),
        _ => Err(ExtractError::EmptyAssets),
    }
}

/// HTTP client for Wistia embed pages
pub struct WistiaClient {
    /// Embed endpoint base URL
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl Default for WistiaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WistiaClient {
    /// Create a client for the public embed endpoint
    pub fn new() -> Self {
        Self::with_client(DEFAULT_EMBED_BASE, reqwest::Client::new())
    }

    /// Create a client with a custom endpoint and HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Create a client from transport settings
    pub fn from_settings(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self, ExtractError> {
        let client = settings.request_client(reqwest::Client::builder())?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AssetSource for WistiaClient {
    fn name(&self) -> &str {
        "wistia"
    }

    #[instrument(skip(self), fields(source = "wistia"))]
    async fn fetch(&self, video_id: &str) -> Result<Vec<RawAsset>, ExtractError> {
        let url = embed_url(&self.base_url, video_id);
        debug!(%url, "Requesting embed page");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let assets = parse_embed_payload(&body)?;

        info!(count = assets.len(), "Embed payload parsed");
        Ok(assets)
    }
}
