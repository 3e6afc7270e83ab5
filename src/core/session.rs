//! Command interface over one asset collection.
//!
//! A `Session` owns the collection and the source it is loaded from. Every
//! user-facing action is one method here. Collection mutations happen under
//! a lock, so a reader never observes a half-applied search, sort or
//! selection change. At most one extraction runs at a time; a second one
//! fails with [`ExtractError::Busy`] instead of queueing.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use crate::adapters::AssetSource;
use crate::domain::{Export, ExportFormat, SortDirection, SortKey};

use super::collection::AssetCollection;
use super::error::ExtractError;
use super::exporter::Exporter;
use super::normalizer;
use super::resolver;

/// Clears the in-flight flag when the extraction settles, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One owned collection plus the operations that act on it
pub struct Session<S: AssetSource> {
    /// Where raw assets come from
    source: S,
    /// The collection every command acts on
    collection: Mutex<AssetCollection>,
    /// Export renderer
    exporter: Exporter,
    /// Set while an extraction is outstanding
    loading: AtomicBool,
}

impl<S: AssetSource> Session<S> {
    /// Create a session with an empty collection
    pub fn new(source: S) -> Self {
        Self::with_exporter(source, Exporter::new())
    }

    pub fn with_exporter(source: S, exporter: Exporter) -> Self {
        Self {
            source,
            collection: Mutex::new(AssetCollection::new()),
            exporter,
            loading: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether an extraction is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    fn begin_extraction(&self) -> Result<InFlight<'_>, ExtractError> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExtractError::Busy)?;
        Ok(InFlight(&self.loading))
    }

    /// Resolve `input`, fetch and normalize its assets, and load them.
    ///
    /// Returns the number of records loaded. On any failure the previous
    /// canonical list is left exactly as it was.
    #[instrument(skip(self), fields(source = %self.source.name()))]
    pub async fn extract(&self, input: &str) -> Result<usize, ExtractError> {
        let _in_flight = self.begin_extraction()?;

        let video_id = resolver::resolve_id(input)?;
        info!(%video_id, "Extracting video assets");

        let raw = match self.source.fetch(&video_id).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%video_id, error = %e, "Extraction failed");
                return Err(e);
            }
        };

        let records = normalizer::normalize(&raw);
        let count = records.len();
        self.collection.lock().load(records);

        info!(%video_id, count, "Assets extracted");
        Ok(count)
    }

    /// Read the collection
    pub fn with_collection<R>(&self, f: impl FnOnce(&AssetCollection) -> R) -> R {
        f(&*self.collection.lock())
    }

    /// Clone the current collection state
    pub fn snapshot(&self) -> AssetCollection {
        self.collection.lock().clone()
    }

    /// Apply a search; returns the number of visible records
    pub fn search(&self, query: &str) -> usize {
        let mut collection = self.collection.lock();
        collection.search(query);
        collection.filtered_len()
    }

    pub fn sort(&self, key: SortKey, direction: SortDirection) {
        self.collection.lock().sort(key, direction);
    }

    /// Sort as a header click; returns the resulting direction
    pub fn sort_by_click(&self, key: SortKey) -> SortDirection {
        let mut collection = self.collection.lock();
        collection.sort_by_click(key);
        collection.sort_config().direction
    }

    pub fn toggle(&self, id: &str) -> bool {
        self.collection.lock().toggle(id)
    }

    pub fn set_checked(&self, id: &str, checked: bool) {
        self.collection.lock().set_checked(id, checked);
    }

    pub fn select_all(&self) {
        self.collection.lock().select_all();
    }

    pub fn deselect_all(&self) {
        self.collection.lock().deselect_all();
    }

    pub fn select_all_checked(&self, checked: bool) {
        self.collection.lock().select_all_checked(checked);
    }

    pub fn toggle_select_all(&self) -> bool {
        self.collection.lock().toggle_select_all()
    }

    /// Render the canonical list
    pub fn export(&self, format: ExportFormat) -> Result<Export, ExtractError> {
        self.exporter.export(&self.collection.lock(), format)
    }
}
