//! Adapter interfaces for external systems.
//!
//! Everything that touches the network lives here: the source that
//! retrieves raw assets for a video id, and the bulk downloader.

pub mod downloader;
pub mod wistia;

use std::time::Duration;

use async_trait::async_trait;

use crate::core::ExtractError;
use crate::domain::RawAsset;

/// Transport settings shared by every HTTP adapter
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// User-Agent header; unset keeps reqwest's default
    pub user_agent: Option<String>,
    /// Transport timeout; unset means none
    pub timeout: Option<Duration>,
}

impl HttpSettings {
    /// Client for short requests: the timeout bounds the whole request
    pub fn request_client(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::Client, ExtractError> {
        let builder = self.with_user_agent(builder);
        let builder = match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        Ok(builder.build()?)
    }

    /// Client for long transfers: the timeout bounds only connecting, so a
    /// slow but live body is never cut off
    pub fn transfer_client(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::Client, ExtractError> {
        let builder = self.with_user_agent(builder);
        let builder = match self.timeout {
            Some(timeout) => builder.connect_timeout(timeout),
            None => builder,
        };
        Ok(builder.build()?)
    }

    fn with_user_agent(&self, builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
        match self.user_agent.as_deref() {
            Some(agent) => builder.user_agent(agent),
            None => builder,
        }
    }
}

// Re-export the concrete adapters
pub use downloader::{DownloadFailure, DownloadPlan, DownloadReport, Downloader, PlannedDownload};
pub use wistia::{embed_url, parse_embed_payload, WistiaClient};

/// A remote source of raw asset lists
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Retrieve the raw assets for a video id, in server order
    async fn fetch(&self, video_id: &str) -> Result<Vec<RawAsset>, ExtractError>;
}
