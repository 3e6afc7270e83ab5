//! Bulk download of selected assets.
//!
//! Downloads start on a stagger (`ordinal × stagger`) so a large selection
//! does not hit the CDN all at once. Each item succeeds or fails on its own;
//! failures are collected into the report and never retried.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::core::{AssetCollection, ExtractError};
use crate::domain::AssetRecord;

use super::HttpSettings;

/// Default gap between consecutive download starts
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(500);

/// One scheduled download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDownload {
    /// Record id
    pub id: String,
    /// Source URL
    pub url: String,
    /// File name inside the download directory
    pub file_name: String,
    /// Delay before the download starts
    pub delay: Duration,
}

/// Downloads scheduled for one bulk action
#[derive(Debug, Clone, Default)]
pub struct DownloadPlan {
    pub items: Vec<PlannedDownload>,
}

impl DownloadPlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A download that did not complete
#[derive(Debug, Clone)]
pub struct DownloadFailure {
    pub id: String,
    pub url: String,
    pub error: String,
}

/// Outcome of a bulk download
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Files written
    pub completed: Vec<PathBuf>,
    /// Items that failed
    pub failures: Vec<DownloadFailure>,
}

impl DownloadReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Staggered bulk downloader
pub struct Downloader {
    /// Target directory
    dir: PathBuf,
    /// Gap between consecutive starts
    stagger: Duration,
    /// HTTP client
    client: reqwest::Client,
}

impl Downloader {
    /// Create a downloader writing into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_client(dir, DEFAULT_STAGGER, reqwest::Client::new())
    }

    /// Create a downloader with a custom stagger and HTTP client
    pub fn with_client(dir: impl Into<PathBuf>, stagger: Duration, client: reqwest::Client) -> Self {
        Self {
            dir: dir.into(),
            stagger,
            client,
        }
    }

    /// Create a downloader whose client follows the transport settings
    pub fn from_settings(
        dir: impl Into<PathBuf>,
        stagger: Duration,
        settings: &HttpSettings,
    ) -> Result<Self, ExtractError> {
        let client = settings.transfer_client(reqwest::Client::builder())?;
        Ok(Self::with_client(dir, stagger, client))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Schedule the collection's selected records, in canonical order.
    ///
    /// Records without a URL are skipped but still take their slot in the
    /// stagger.
    pub fn plan(&self, collection: &AssetCollection) -> Result<DownloadPlan, ExtractError> {
        let selected = collection.selected_records();
        if selected.is_empty() {
            return Err(ExtractError::NothingSelected);
        }

        let mut used_names = HashSet::new();
        let items = selected
            .into_iter()
            .enumerate()
            .filter_map(|(ordinal, record)| {
                let url = record.url.clone()?;
                let mut file_name = file_name_for(record, ordinal);
                if !used_names.insert(file_name.clone()) {
                    file_name = format!("{}_{}", record.id, file_name);
                    used_names.insert(file_name.clone());
                }
                Some(PlannedDownload {
                    id: record.id.clone(),
                    url,
                    file_name,
                    delay: self.stagger.saturating_mul(u32::try_from(ordinal).unwrap_or(u32::MAX)),
                })
            })
            .collect();

        Ok(DownloadPlan { items })
    }

    /// Run every planned download concurrently, each after its delay
    pub async fn run(&self, plan: DownloadPlan) -> Result<DownloadReport, ExtractError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ExtractError::Io(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        info!(count = plan.len(), dir = %self.dir.display(), "Starting bulk download");

        let mut tasks = JoinSet::new();
        for item in plan.items {
            let client = self.client.clone();
            let path = self.dir.join(&item.file_name);
            tasks.spawn(async move {
                tokio::time::sleep(item.delay).await;
                let result = download_one(&client, &item.url, &path).await;
                (item, path, result)
            });
        }

        let mut report = DownloadReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, path, Ok(bytes))) => {
                    debug!(path = %path.display(), bytes, "Download complete");
                    report.completed.push(path);
                }
                Ok((item, _, Err(error))) => {
                    warn!(id = %item.id, %error, "Download failed");
                    report.failures.push(DownloadFailure {
                        id: item.id,
                        url: item.url,
                        error,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Download task aborted");
                    report.failures.push(DownloadFailure {
                        id: String::new(),
                        url: String::new(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.completed.sort();
        Ok(report)
    }
}

/// Stream one URL to `path`, returning the byte count.
///
/// The body goes to a `.part` file beside `path` that is renamed into place
/// only once fully written, so a failed transfer leaves nothing at `path`.
async fn download_one(client: &reqwest::Client, url: &str, path: &Path) -> Result<u64, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    let partial = partial_path(path);
    match stream_to(response, &partial).await {
        Ok(written) => {
            tokio::fs::rename(&partial, path)
                .await
                .map_err(|e| format!("Failed to move {} into place: {}", path.display(), e))?;
            Ok(written)
        }
        Err(error) => {
            if let Err(e) = tokio::fs::remove_file(&partial).await {
                debug!(path = %partial.display(), error = %e, "Could not remove partial download");
            }
            Err(error)
        }
    }
}

async fn stream_to(mut response: reqwest::Response, path: &Path) -> Result<u64, String> {
    let mut file = File::create(path)
        .await
        .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| e.to_string())?;

    Ok(written)
}

/// `clip.mp4` downloads into `clip.mp4.part`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// File name for a record: its display name with the extension appended
fn file_name_for(record: &AssetRecord, ordinal: usize) -> String {
    let stem: String = record
        .display_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() {
        format!("asset_{}", ordinal + 1)
    } else {
        stem.to_string()
    };

    let suffix = format!(".{}", record.ext.to_lowercase());
    if record.ext.is_empty() || stem.to_lowercase().ends_with(&suffix) {
        stem
    } else {
        format!("{}{}", stem, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ordinal: usize, name: &str, url: Option<&str>) -> AssetRecord {
        AssetRecord {
            id: AssetRecord::id_for(ordinal),
            display_name: name.to_string(),
            size: 0,
            width: None,
            height: None,
            url: url.map(str::to_string),
            ext: "mp4".to_string(),
            asset_type: "video".to_string(),
        }
    }

    #[test]
    fn test_file_name_for() {
        assert_eq!(file_name_for(&record(0, "Original File", None), 0), "Original File.mp4");
        assert_eq!(file_name_for(&record(0, "clip.MP4", None), 0), "clip.MP4");
        assert_eq!(file_name_for(&record(0, "a/b:c", None), 0), "a_b_c.mp4");
        assert_eq!(file_name_for(&record(0, "  ", None), 3), "asset_4.mp4");
        assert_eq!(file_name_for(&record(0, "..", None), 0), "asset_1.mp4");
    }

    #[test]
    fn test_plan_requires_selection() {
        let mut collection = AssetCollection::new();
        collection.load(vec![record(0, "a", Some("https://x/a.mp4"))]);

        let downloader = Downloader::new("/tmp");
        assert!(matches!(
            downloader.plan(&collection),
            Err(ExtractError::NothingSelected)
        ));
    }

    #[test]
    fn test_plan_staggers_by_selected_ordinal() {
        let mut collection = AssetCollection::new();
        collection.load(vec![
            record(0, "a", Some("https://x/a.mp4")),
            record(1, "b", None),
            record(2, "c", Some("https://x/c.mp4")),
            record(3, "d", Some("https://x/d.mp4")),
        ]);
        collection.toggle("asset_3");
        collection.toggle("asset_0");
        collection.toggle("asset_1");

        let downloader = Downloader::with_client("/tmp", Duration::from_millis(100), reqwest::Client::new());
        let plan = downloader.plan(&collection).unwrap();

        let ids: Vec<&str> = plan.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["asset_0", "asset_3"]);
        assert_eq!(plan.items[0].delay, Duration::ZERO);
        // asset_1 has no url but still occupies slot 1
        assert_eq!(plan.items[1].delay, Duration::from_millis(200));
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/dl/clip.mp4")),
            PathBuf::from("/dl/clip.mp4.part")
        );
    }

    #[test]
    fn test_plan_saturates_huge_stagger() {
        let mut collection = AssetCollection::new();
        collection.load(vec![
            record(0, "a", Some("https://x/a.mp4")),
            record(1, "b", Some("https://x/b.mp4")),
            record(2, "c", Some("https://x/c.mp4")),
        ]);
        collection.select_all();

        let downloader = Downloader::with_client("/tmp", Duration::MAX, reqwest::Client::new());
        let plan = downloader.plan(&collection).unwrap();

        assert_eq!(plan.items[0].delay, Duration::ZERO);
        assert_eq!(plan.items[1].delay, Duration::MAX);
        assert_eq!(plan.items[2].delay, Duration::MAX);
    }

    #[test]
    fn test_plan_deduplicates_file_names() {
        let mut collection = AssetCollection::new();
        collection.load(vec![
            record(0, "clip", Some("https://x/a.mp4")),
            record(1, "clip", Some("https://x/b.mp4")),
        ]);
        collection.select_all();

        let plan = Downloader::new("/tmp").plan(&collection).unwrap();
        assert_eq!(plan.items[0].file_name, "clip.mp4");
        assert_eq!(plan.items[1].file_name, "asset_1_clip.mp4");
    }
}
