//! Configuration for the embed endpoint, downloads and exports.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (WISTIA_ASSETS_ENDPOINT, WISTIA_ASSETS_DOWNLOAD_DIR)
//! 2. Config file (.wistia-assets/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .wistia-assets/config.yaml
//! - Paths in config file are relative to the directory holding .wistia-assets/

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::downloader::DEFAULT_STAGGER;
use crate::adapters::HttpSettings;
use crate::adapters::wistia::DEFAULT_EMBED_BASE;
use crate::core::{DEFAULT_CSV_FILENAME, DEFAULT_JSON_FILENAME};

/// Directory holding the config file
pub const CONFIG_DIR: &str = ".wistia-assets";

pub const ENV_ENDPOINT: &str = "WISTIA_ASSETS_ENDPOINT";
pub const ENV_DOWNLOAD_DIR: &str = "WISTIA_ASSETS_DOWNLOAD_DIR";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    /// Embed endpoint base URL
    pub base_url: Option<String>,
    /// User-Agent header for requests
    pub user_agent: Option<String>,
    /// Transport timeout; unset means the HTTP client's default
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadConfig {
    /// Download directory (relative to the config file's project root)
    pub dir: Option<String>,
    /// Gap between consecutive download starts
    pub stagger_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    pub csv_filename: Option<String>,
    pub json_filename: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Embed endpoint base URL
    pub endpoint: String,
    /// Optional User-Agent override
    pub user_agent: Option<String>,
    /// Optional transport timeout
    pub timeout: Option<Duration>,
    /// Bulk download target directory
    pub download_dir: PathBuf,
    /// Gap between consecutive download starts
    pub stagger: Duration,
    /// CSV export file name
    pub csv_filename: String,
    /// JSON export file name
    pub json_filename: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Transport settings for every HTTP client
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
    }
}

/// Environment overrides, read once so resolution stays testable
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    endpoint: Option<String>,
    download_dir: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            endpoint: std::env::var(ENV_ENDPOINT).ok().filter(|v| !v.is_empty()),
            download_dir: std::env::var(ENV_DOWNLOAD_DIR).ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Expand a leading `~` to the home directory
fn expand_home(path_str: &str) -> PathBuf {
    let rest = match path_str.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path_str),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path_str),
    }
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = expand_home(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine a config file (if any), environment overrides and defaults
fn resolve(config_file: Option<PathBuf>, env: EnvOverrides, cwd: &Path) -> Result<ResolvedConfig> {
    let parsed = config_file.as_deref().map(load_config_file).transpose()?;

    // Project root is the parent of .wistia-assets/
    let base_dir = config_file
        .as_deref()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .unwrap_or(cwd);

    let (endpoint, download, export) = match parsed {
        Some(file) => (file.endpoint, file.download, file.export),
        None => Default::default(),
    };

    let download_dir = if let Some(dir) = env.download_dir {
        expand_home(&dir)
    } else if let Some(ref dir) = download.dir {
        resolve_path(base_dir, dir)
    } else {
        cwd.to_path_buf()
    };

    Ok(ResolvedConfig {
        endpoint: env
            .endpoint
            .or(endpoint.base_url)
            .unwrap_or_else(|| DEFAULT_EMBED_BASE.to_string()),
        user_agent: endpoint.user_agent,
        timeout: endpoint.timeout_seconds.map(Duration::from_secs),
        download_dir,
        stagger: download
            .stagger_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STAGGER),
        csv_filename: export
            .csv_filename
            .unwrap_or_else(|| DEFAULT_CSV_FILENAME.to_string()),
        json_filename: export
            .json_filename
            .unwrap_or_else(|| DEFAULT_JSON_FILENAME.to_string()),
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config_file = find_config_file_from(&cwd);
    resolve(config_file, EnvOverrides::from_env(), &cwd)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
