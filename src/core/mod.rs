//! Core extraction and collection logic.
//!
//! This module contains:
//! - Resolver: video id from free-form input
//! - Normalizer: raw payload assets to ordered records
//! - Collection: canonical list, filtered view, sort and selection
//! - Exporter: CSV and JSON rendering
//! - Session: the command interface tying them together

pub mod collection;
pub mod error;
pub mod exporter;
pub mod normalizer;
pub mod resolver;
pub mod session;

// Re-export commonly used types
pub use collection::{AssetCollection, SelectionState};
pub use error::ExtractError;
pub use exporter::{Exporter, DEFAULT_CSV_FILENAME, DEFAULT_JSON_FILENAME};
pub use normalizer::{extension_for_type, normalize, normalize_asset, process_url};
pub use resolver::{is_valid_input, resolve, resolve_id};
pub use session::Session;
