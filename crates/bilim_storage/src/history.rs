//! Publish history backends.

use crate::json_file::{read_json, write_json};
use async_trait::async_trait;
use bilim_core::{HistoryEntry, NormalizedKey};
use bilim_error::BilimResult;
use bilim_interface::HistoryStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

fn keys_of(entries: &[HistoryEntry]) -> HashSet<NormalizedKey> {
    entries
        .iter()
        .map(|entry| NormalizedKey::new(entry.fact_text()))
        .collect()
}

/// History persisted as a JSON array of [`HistoryEntry`] objects.
#[derive(Debug)]
pub struct JsonHistoryStore {
    path: PathBuf,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl JsonHistoryStore {
    /// Opens the history at `path`. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or decoded.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> BilimResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries: Vec<HistoryEntry> = read_json(&path).await?.unwrap_or_default();
        debug!(entries = entries.len(), "Loaded publish history");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn keys(&self) -> BilimResult<HashSet<NormalizedKey>> {
        Ok(keys_of(&self.entries.lock().await))
    }

    #[instrument(skip(self, entry), fields(category = %entry.category()))]
    async fn append(&self, entry: HistoryEntry) -> BilimResult<()> {
        let mut entries = self.entries.lock().await;
        entries.push(entry);
        if let Err(e) = write_json(&self.path, entries.as_slice()).await {
            entries.pop();
            return Err(e);
        }
        debug!(entries = entries.len(), "Appended to publish history");
        Ok(())
    }

    async fn count(&self) -> BilimResult<usize> {
        Ok(self.entries.lock().await.len())
    }
}

/// In-memory history.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: parking_lot::Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistoryStore {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history pre-populated with `entries`.
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: parking_lot::Mutex::new(entries),
        }
    }

    /// Copy of every recorded entry.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn keys(&self) -> BilimResult<HashSet<NormalizedKey>> {
        Ok(keys_of(&self.entries.lock()))
    }

    async fn append(&self, entry: HistoryEntry) -> BilimResult<()> {
        self.entries.lock().push(entry);
        Ok(())
    }

    async fn count(&self) -> BilimResult<usize> {
        Ok(self.entries.lock().len())
    }
}
