//! Export formats and the exported row shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::asset::AssetRecord;

/// Supported export encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// MIME type of the exported document
    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = crate::core::ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(crate::core::ExtractError::UnknownFormat(other.to_string())),
        }
    }
}

/// Projection of a record written to exports. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub name: String,
    pub size: u64,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub extension: String,
}

impl ExportRow {
    /// Column names, in output order
    pub const COLUMNS: [&'static str; 7] =
        ["name", "size", "width", "height", "url", "type", "extension"];
}

impl From<&AssetRecord> for ExportRow {
    fn from(record: &AssetRecord) -> Self {
        Self {
            name: record.display_name.clone(),
            size: record.size,
            width: record.width,
            height: record.height,
            url: record.url.clone(),
            asset_type: record.asset_type.clone(),
            extension: record.ext.clone(),
        }
    }
}

/// A rendered export, ready for the caller to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub content: String,
    pub filename: String,
    pub media_type: &'static str,
}
