//! Domain types for asset extraction.
//!
//! This module contains the core data structures:
//! - Asset: raw and normalized asset records
//! - Sort: sort keys and the active sort configuration
//! - Export: export formats and the exported row shape

pub mod asset;
pub mod export;
pub mod sort;

// Re-export commonly used types
pub use asset::{format_size, AssetRecord, RawAsset, DEFAULT_ASSET_TYPE};
pub use export::{Export, ExportFormat, ExportRow};
pub use sort::{SortConfig, SortDirection, SortKey};
