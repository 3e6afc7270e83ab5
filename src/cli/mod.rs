//! Command-line interface for wistia-assets.
//!
//! Provides commands for resolving video ids, listing a video's assets,
//! exporting them, bulk downloading a selection, and showing configuration.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{Downloader, WistiaClient};
use crate::config::{self, ResolvedConfig};
use crate::core::{resolve, Exporter, Session};
use crate::domain::{format_size, AssetRecord, ExportFormat, SortDirection, SortKey};

/// wistia-assets - Extract downloadable assets from Wistia videos
#[derive(Parser, Debug)]
#[command(name = "wistia-assets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the video id a URL or id resolves to
    Resolve {
        /// Wistia video id or URL
        input: String,
    },

    /// List a video's assets
    List {
        /// Wistia video id or URL
        input: String,

        /// Only show assets whose name, url or extension contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Sort column (size, name, width, or any other field)
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Export a video's assets as CSV or JSON
    Export {
        /// Wistia video id or URL
        input: String,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output file (defaults to the configured export file name)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the export to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Download selected assets of a video
    Download {
        /// Wistia video id or URL
        input: String,

        /// Restrict the visible assets before selecting
        #[arg(short, long)]
        search: Option<String>,

        /// Asset ids to select (e.g. asset_0); repeatable
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Select every visible asset
        #[arg(long)]
        all: bool,

        /// Target directory (defaults to the configured download directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Milliseconds between consecutive download starts
        #[arg(long)]
        stagger_ms: Option<u64>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Export format for CLI (maps to ExportFormat)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Resolve { input } => resolve_input(&input),
            Commands::List {
                input,
                search,
                sort,
                desc,
            } => list_assets(&input, search, sort, desc).await,
            Commands::Export {
                input,
                format,
                output,
                stdout,
            } => export_assets(&input, format.into(), output, stdout).await,
            Commands::Download {
                input,
                search,
                ids,
                all,
                dir,
                stagger_ms,
            } => download_assets(&input, search, ids, all, dir, stagger_ms).await,
            Commands::Config => show_config(),
        }
    }
}

/// Build a session against the configured endpoint
fn open_session(cfg: &ResolvedConfig) -> Result<Session<WistiaClient>> {
    let client = WistiaClient::from_settings(&cfg.endpoint, &cfg.http_settings())
        .context("Failed to build HTTP client")?;
    let exporter = Exporter::with_filenames(&cfg.csv_filename, &cfg.json_filename);
    Ok(Session::with_exporter(client, exporter))
}

/// Print the resolved id
fn resolve_input(input: &str) -> Result<()> {
    match resolve(input) {
        Some(id) => {
            println!("{}", id);
            Ok(())
        }
        None => anyhow::bail!("{}", crate::core::ExtractError::Input),
    }
}

/// List a video's assets as a table
async fn list_assets(
    input: &str,
    search: Option<String>,
    sort: Option<String>,
    desc: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let session = open_session(cfg)?;

    let count = session.extract(input).await?;
    eprintln!("Found {} assets", count);

    if let Some(query) = search {
        let visible = session.search(&query);
        eprintln!("Search results: {} assets found", visible);
    }

    if let Some(key) = sort {
        let key: SortKey = key.parse().unwrap_or_else(|never| match never {});
        let direction = if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        session.sort(key, direction);
    }

    session.with_collection(|collection| {
        let visible = collection.filtered();
        if visible.is_empty() {
            println!("No assets match");
            return;
        }
        print_table(&visible);
    });

    Ok(())
}

fn print_table(records: &[&AssetRecord]) {
    println!(
        "{:<10} {:<32} {:>12} {:<13} {}",
        "ID", "NAME", "SIZE", "DIMENSIONS", "URL"
    );
    println!("{}", "-".repeat(100));

    for record in records {
        let name = if record.display_name.chars().count() > 32 {
            let truncated: String = record.display_name.chars().take(29).collect();
            format!("{}...", truncated)
        } else {
            record.display_name.clone()
        };
        println!(
            "{:<10} {:<32} {:>12} {:<13} {}",
            record.id,
            name,
            format_size(record.size),
            record.dimensions().unwrap_or_else(|| "N/A".to_string()),
            record.url.as_deref().unwrap_or("N/A"),
        );
    }
}

/// Export a video's assets
async fn export_assets(
    input: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
    to_stdout: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let session = open_session(cfg)?;

    session.extract(input).await?;
    let export = session.export(format)?;

    if to_stdout {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(export.content.as_bytes())
            .context("Failed to write export to stdout")?;
        writeln!(stdout)?;
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));
    tokio::fs::write(&path, &export.content)
        .await
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    eprintln!(
        "Data exported as {} ({}) to {}",
        format.to_string().to_uppercase(),
        export.media_type,
        path.display()
    );

    Ok(())
}

/// Download a selection of a video's assets
async fn download_assets(
    input: &str,
    search: Option<String>,
    ids: Vec<String>,
    all: bool,
    dir: Option<PathBuf>,
    stagger_ms: Option<u64>,
) -> Result<()> {
    let cfg = config::config()?;
    let session = open_session(cfg)?;

    session.extract(input).await?;

    if let Some(query) = search {
        session.search(&query);
    }
    if all {
        session.select_all();
    }
    for id in &ids {
        if session.with_collection(|c| c.get(id).is_none()) {
            anyhow::bail!("Unknown asset id: {}", id);
        }
        session.set_checked(id, true);
    }

    let stagger = stagger_ms
        .map(std::time::Duration::from_millis)
        .unwrap_or(cfg.stagger);
    let dir = dir.unwrap_or_else(|| cfg.download_dir.clone());
    let downloader = Downloader::from_settings(dir, stagger, &cfg.http_settings())
        .context("Failed to build HTTP client")?;

    let plan = session.with_collection(|c| downloader.plan(c))?;
    eprintln!(
        "Downloading {} selected assets to {}",
        plan.len(),
        downloader.dir().display()
    );

    let report = downloader.run(plan).await?;

    for path in &report.completed {
        println!("{}", path.display());
    }
    for failure in &report.failures {
        eprintln!("Failed {} ({}): {}", failure.id, failure.url, failure.error);
    }

    if !report.is_success() {
        anyhow::bail!("{} of the downloads failed", report.failures.len());
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("wistia-assets configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Endpoint:");
    println!("  Base URL:   {}", cfg.endpoint);
    println!(
        "  User agent: {}",
        cfg.user_agent.as_deref().unwrap_or("(client default)")
    );
    println!(
        "  Timeout:    {}",
        cfg.timeout
            .map(|t| format!("{}s", t.as_secs()))
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!();
    println!("Downloads:");
    println!("  Directory:  {}", cfg.download_dir.display());
    println!("  Stagger:    {}ms", cfg.stagger.as_millis());
    println!();
    println!("Exports:");
    println!("  CSV:        {}", cfg.csv_filename);
    println!("  JSON:       {}", cfg.json_filename);

    Ok(())
}
