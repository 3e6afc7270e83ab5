//! CSV and JSON export of the canonical asset list.
//!
//! Exports always cover every extracted record in extraction order,
//! regardless of the active search, sort or selection.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::{Export, ExportFormat, ExportRow};

use super::collection::AssetCollection;
use super::error::ExtractError;

pub const DEFAULT_CSV_FILENAME: &str = "wistia_assets.csv";
pub const DEFAULT_JSON_FILENAME: &str = "wistia_assets.json";

/// Renders exports with configurable file names
#[derive(Debug, Clone)]
pub struct Exporter {
    csv_filename: String,
    json_filename: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    /// Exporter using the default file names
    pub fn new() -> Self {
        Self::with_filenames(DEFAULT_CSV_FILENAME, DEFAULT_JSON_FILENAME)
    }

    pub fn with_filenames(csv_filename: impl Into<String>, json_filename: impl Into<String>) -> Self {
        Self {
            csv_filename: csv_filename.into(),
            json_filename: json_filename.into(),
        }
    }

    /// Render the collection's canonical list in `format`
    pub fn export(&self, collection: &AssetCollection, format: ExportFormat) -> Result<Export, ExtractError> {
        if collection.is_empty() {
            return Err(ExtractError::NoData);
        }

        let rows: Vec<ExportRow> = collection.records().iter().map(ExportRow::from).collect();

        let (content, filename) = match format {
            ExportFormat::Csv => (to_csv(&rows)?, &self.csv_filename),
            ExportFormat::Json => (to_json(&rows)?, &self.json_filename),
        };

        Ok(Export {
            content,
            filename: filename.clone(),
            media_type: format.media_type(),
        })
    }
}

/// Header line, then one fully quoted line per row, joined with `\n`
fn to_csv(rows: &[ExportRow]) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| ExtractError::Export(format!("CSV serialization failed: {}", e)))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| ExtractError::Export(format!("CSV export failed: {}", e)))?;
    let body = String::from_utf8(body)
        .map_err(|e| ExtractError::Export(format!("CSV export failed: {}", e)))?;

    let mut content = ExportRow::COLUMNS.join(",");
    content.push('\n');
    content.push_str(body.trim_end_matches('\n'));
    Ok(content)
}

fn to_json(rows: &[ExportRow]) -> Result<String, ExtractError> {
    serde_json::to_string_pretty(rows)
        .map_err(|e| ExtractError::Export(format!("JSON export failed: {}", e)))
}
