//! wistia-assets - Extract downloadable asset metadata from Wistia videos
//!
//! Resolves a video id from a URL or bare id, reads the media document the
//! embed page carries, and normalizes its assets into stable records that
//! can be searched, sorted, selected, exported and downloaded.
//!
//! # Architecture
//!
//! The data flows one way:
//! - input text is resolved to a video id
//! - an `AssetSource` fetches the raw asset list for the id
//! - the normalizer turns raw assets into ordered `AssetRecord`s
//! - an `AssetCollection` holds them, with a filtered view, sort and selection
//! - the exporter renders the canonical list as CSV or JSON
//!
//! # Modules
//!
//! - `adapters`: External system integrations (Wistia embed pages, downloads)
//! - `core`: Resolution, normalization, collection, export, session
//! - `domain`: Data structures (AssetRecord, SortConfig, ExportRow)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List a video's assets, largest first
//! wistia-assets list https://example.wistia.com/medias/abc123 --sort size --desc
//!
//! # Export them as JSON
//! wistia-assets export abc123 --format json
//!
//! # Download every mp4
//! wistia-assets download abc123 --search mp4 --all
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{AssetSource, Downloader, HttpSettings, WistiaClient};
pub use crate::core::{AssetCollection, Exporter, ExtractError, SelectionState, Session};
pub use domain::{AssetRecord, Export, ExportFormat, RawAsset, SortConfig, SortDirection, SortKey};
