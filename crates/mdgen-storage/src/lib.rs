//! Ephemeral artifact storage for generated documents.
//!
//! Each artifact is one file in a flat storage directory, addressed by a
//! random id rather than by its user-facing name:
//!
//! ```text
//! exports/
//!   3f0c9a1e5b2d4c7e8f90a1b2c3d4e5f6.md    live artifact
//!   .8c1d...e2.tmp                          write in progress
//!   .77ab...09.purge                        deletion in progress
//! ```
//!
//! Writes go to a temp file and are renamed into place; deletions rename
//! the file away before unlinking it. A reader therefore sees either the
//! complete content or nothing. Artifacts expire a fixed retention window
//! after creation and are removed by [`ArtifactStore::sweep`], usually
//! driven by a [`RetentionSweeper`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub mod clock;
mod error;
pub mod id;
pub mod slug;
pub mod sweeper;
pub mod text;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use sweeper::{RetentionSweeper, SweeperHandle};

/// Default retention window (one hour).
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(3600);

/// Display name given to artifacts adopted from a previous run.
const RECOVERED_DISPLAY_NAME: &str = "document.md";

/// Attempts at drawing an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

const ARTIFACT_SUFFIX: &str = ".md";
const TEMP_SUFFIX: &str = ".tmp";
const PURGE_SUFFIX: &str = ".purge";

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding artifact files.
    pub storage_dir: PathBuf,
    /// How long an artifact stays retrievable after creation.
    pub retention: Duration,
    /// Prefix for download URLs; `/downloads/{id}` is appended.
    pub base_url: String,
}

impl StoreConfig {
    pub fn new(storage_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            retention: DEFAULT_RETENTION,
            base_url: base_url.into(),
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

/// Bookkeeping for one live artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    pub id: String,
    pub display_name: String,
    pub size_bytes: u64,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ArtifactRecord {
    /// Whether the artifact is still retrievable at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Returned to the caller for a freshly written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDescriptor {
    pub id: String,
    pub url: String,
    pub display_name: String,
    pub size_bytes: u64,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A live artifact and its content.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub record: ArtifactRecord,
    pub content: Vec<u8>,
}

/// Summary of the store's current contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub live_artifacts: usize,
    pub total_bytes: u64,
    pub retention_seconds: u64,
}

/// Retention-managed artifact store.
///
/// Cheap to clone; clones share the same index and directory.
#[derive(Clone)]
pub struct ArtifactStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    index: RwLock<HashMap<String, ArtifactRecord>>,
}

impl ArtifactStore {
    /// Open a store backed by the wall clock.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Open a store with an explicit time source.
    ///
    /// Creates the storage directory if needed, removes leftovers from
    /// interrupted writes and deletions, and adopts artifacts written by a
    /// previous run so the sweeper can expire them.
    pub async fn open_with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        fs::create_dir_all(&config.storage_dir).await.map_err(|e| {
            Error::storage_write(
                &format!(
                    "failed to create storage directory {}",
                    config.storage_dir.display()
                ),
                e,
            )
        })?;

        let store = Self {
            inner: Arc::new(StoreInner {
                config,
                clock,
                index: RwLock::new(HashMap::new()),
            }),
        };

        let adopted = store.recover().await?;
        info!(
            storage_dir = %store.inner.config.storage_dir.display(),
            retention_secs = store.inner.config.retention.as_secs(),
            adopted,
            "Artifact store opened"
        );

        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// The retention window as a chrono duration.
    pub fn retention_window(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.inner.config.retention)
            .unwrap_or_else(|_| chrono::Duration::seconds(DEFAULT_RETENTION.as_secs() as i64))
    }

    /// Path of the artifact file for a (validated) id.
    pub fn artifact_path(&self, id: &str) -> PathBuf {
        self.inner
            .config
            .storage_dir
            .join(format!("{}{}", id, ARTIFACT_SUFFIX))
    }

    fn temp_path(&self, id: &str) -> PathBuf {
        self.inner
            .config
            .storage_dir
            .join(format!(".{}{}", id, TEMP_SUFFIX))
    }

    fn purge_path(&self, id: &str) -> PathBuf {
        self.inner
            .config
            .storage_dir
            .join(format!(".{}{}", id, PURGE_SUFFIX))
    }

    /// Download URL for an artifact id.
    pub fn download_url(&self, id: &str) -> String {
        format!(
            "{}/downloads/{}",
            self.inner.config.base_url.trim_end_matches('/'),
            id
        )
    }

    /// Persist `content` as a new artifact.
    ///
    /// The write runs on its own task, so dropping the returned future does
    /// not interrupt it: the artifact is either fully written and indexed,
    /// or the temp file is removed and an error is returned.
    pub async fn write(
        &self,
        content: &str,
        suggested_name: Option<&str>,
    ) -> Result<ArtifactDescriptor> {
        if content.is_empty() {
            return Err(Error::InvalidInput("content must not be empty".into()));
        }

        let display_name = slug::display_name(suggested_name);
        let word_count = text::count_words(content);
        let bytes = content.as_bytes().to_vec();

        let store = self.clone();
        let record = tokio::spawn(async move { store.persist(bytes, display_name, word_count).await })
            .await
            .map_err(|e| Error::StorageWrite(format!("write task failed: {}", e)))??;

        Ok(self.describe(&record))
    }

    async fn persist(
        &self,
        bytes: Vec<u8>,
        display_name: String,
        word_count: usize,
    ) -> Result<ArtifactRecord> {
        let id = self.fresh_id().await?;
        // Timestamps leave the store at millisecond precision, so keep them there.
        let created_at = self.now().trunc_subsecs(3);
        let temp_path = self.temp_path(&id);
        let final_path = self.artifact_path(&id);

        if let Err(e) = fs::write(&temp_path, &bytes).await {
            discard_temp(&temp_path).await;
            return Err(Error::storage_write("failed to write artifact", e));
        }
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            discard_temp(&temp_path).await;
            return Err(Error::storage_write("failed to publish artifact", e));
        }

        let record = ArtifactRecord {
            id: id.clone(),
            display_name,
            size_bytes: bytes.len() as u64,
            word_count,
            created_at,
            expires_at: (created_at + self.retention_window()).trunc_subsecs(3),
        };
        self.inner.index.write().await.insert(id, record.clone());

        info!(
            artifact_id = %record.id,
            display_name = %record.display_name,
            size_bytes = record.size_bytes,
            expires_at = %record.expires_at,
            "Artifact written"
        );

        Ok(record)
    }

    async fn fresh_id(&self) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = id::generate_id();
            if self.inner.index.read().await.contains_key(&candidate) {
                continue;
            }
            let on_disk = fs::try_exists(self.artifact_path(&candidate))
                .await
                .map_err(|e| Error::storage_write("failed to check artifact path", e))?;
            if !on_disk {
                return Ok(candidate);
            }
        }
        Err(Error::StorageWrite("could not allocate an unused artifact id".into()))
    }

    fn describe(&self, record: &ArtifactRecord) -> ArtifactDescriptor {
        ArtifactDescriptor {
            id: record.id.clone(),
            url: self.download_url(&record.id),
            display_name: record.display_name.clone(),
            size_bytes: record.size_bytes,
            word_count: record.word_count,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }

    /// Read a live artifact.
    pub async fn read(&self, id: &str) -> Result<Artifact> {
        self.read_at(id, self.now()).await
    }

    /// Read a live artifact as of `now`.
    ///
    /// Malformed ids are rejected before the file system is touched. Reads
    /// never extend an artifact's expiry.
    pub async fn read_at(&self, id: &str, now: DateTime<Utc>) -> Result<Artifact> {
        if !id::is_valid_id(id) {
            debug!(id, "Rejected malformed artifact id");
            return Err(Error::NotFound(id.to_string()));
        }

        let record = self
            .inner
            .index
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if !record.is_live_at(now) {
            return Err(Error::NotFound(id.to_string()));
        }

        match fs::read(self.artifact_path(id)).await {
            Ok(content) => Ok(Artifact { record, content }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(id.to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Sweep using the store's clock.
    pub async fn sweep_now(&self) -> usize {
        self.sweep(self.now()).await
    }

    /// Purge every artifact whose retention window has elapsed at `now`.
    ///
    /// Also removes unindexed files older than the retention window (leftovers
    /// from crashed writes). Failures are logged per entry and never abort
    /// the pass. Returns the number of artifacts purged.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<ArtifactRecord> = {
            let mut index = self.inner.index.write().await;
            let ids: Vec<String> = index
                .values()
                .filter(|record| !record.is_live_at(now))
                .map(|record| record.id.clone())
                .collect();
            ids.iter().filter_map(|id| index.remove(id)).collect()
        };

        let mut purged = 0;
        for record in &expired {
            match self.purge(&record.id).await {
                Ok(()) => {
                    debug!(artifact_id = %record.id, "Purged expired artifact");
                    purged += 1;
                }
                Err(e) => warn!(error = %e, "Skipping artifact during sweep"),
            }
        }

        purged += self.sweep_strays(now).await;

        if purged > 0 {
            info!(purged, "Retention sweep complete");
        }
        purged
    }

    /// Rename the artifact away, then unlink it.
    async fn purge(&self, id: &str) -> Result<()> {
        let purge_path = self.purge_path(id);
        fs::rename(self.artifact_path(id), &purge_path)
            .await
            .map_err(|source| Error::SweepEntry {
                id: id.to_string(),
                source,
            })?;
        fs::remove_file(&purge_path)
            .await
            .map_err(|source| Error::SweepEntry {
                id: id.to_string(),
                source,
            })
    }

    async fn sweep_strays(&self, now: DateTime<Utc>) -> usize {
        let entries = match self.scan().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to scan storage directory");
                return 0;
            }
        };

        let retention = self.retention_window();
        let mut purged = 0;

        for entry in entries {
            let is_stale = entry
                .modified
                .map(|modified| now - modified >= retention)
                .unwrap_or(false);

            match entry.kind {
                // A fresh purge file may belong to a concurrent sweep.
                EntryKind::Purge if is_stale => {
                    if let Err(e) = fs::remove_file(&entry.path).await {
                        warn!(id = %entry.id, error = %e, "Failed to remove purge leftover");
                    }
                }
                EntryKind::Temp if is_stale => {
                    if let Err(e) = fs::remove_file(&entry.path).await {
                        warn!(id = %entry.id, error = %e, "Failed to remove stale temp file");
                    }
                }
                EntryKind::Artifact if is_stale => {
                    if self.inner.index.read().await.contains_key(&entry.id) {
                        continue;
                    }
                    match self.purge(&entry.id).await {
                        Ok(()) => {
                            debug!(artifact_id = %entry.id, "Purged unindexed artifact");
                            purged += 1;
                        }
                        Err(e) => warn!(error = %e, "Skipping unindexed artifact"),
                    }
                }
                _ => {}
            }
        }

        purged
    }

    /// Adopt artifact files from a previous run and clear leftovers.
    async fn recover(&self) -> Result<usize> {
        let entries = self.scan().await?;
        let retention = self.retention_window();
        let mut adopted = 0;

        for entry in entries {
            match entry.kind {
                EntryKind::Temp | EntryKind::Purge => {
                    if let Err(e) = fs::remove_file(&entry.path).await {
                        warn!(path = %entry.path.display(), error = %e, "Failed to remove leftover file");
                    }
                }
                EntryKind::Artifact => {
                    let content = match fs::read(&entry.path).await {
                        Ok(content) => content,
                        Err(e) => {
                            warn!(path = %entry.path.display(), error = %e, "Failed to read leftover artifact");
                            continue;
                        }
                    };
                    let created_at = entry
                        .modified
                        .unwrap_or_else(|| self.now())
                        .trunc_subsecs(3);
                    let record = ArtifactRecord {
                        id: entry.id.clone(),
                        display_name: RECOVERED_DISPLAY_NAME.to_string(),
                        size_bytes: content.len() as u64,
                        word_count: text::count_words(&String::from_utf8_lossy(&content)),
                        created_at,
                        expires_at: (created_at + retention).trunc_subsecs(3),
                    };
                    self.inner.index.write().await.insert(entry.id, record);
                    adopted += 1;
                }
            }
        }

        Ok(adopted)
    }

    /// List files in the storage directory that belong to the store.
    async fn scan(&self) -> Result<Vec<DirEntry>> {
        let mut read_dir = fs::read_dir(&self.inner.config.storage_dir).await?;
        let mut entries = Vec::new();

        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some((id, kind)) = classify(name) else {
                continue;
            };
            let modified = entry
                .metadata()
                .await
                .ok()
                .and_then(|meta| meta.modified().ok())
                .map(DateTime::<Utc>::from);

            entries.push(DirEntry {
                id: id.to_string(),
                kind,
                path: entry.path(),
                modified,
            });
        }

        Ok(entries)
    }

    /// Counts of live artifacts and their total size.
    pub async fn stats(&self) -> StoreStats {
        let now = self.now();
        let index = self.inner.index.read().await;
        let (live_artifacts, total_bytes) = index
            .values()
            .filter(|record| record.is_live_at(now))
            .fold((0, 0), |(count, bytes), record| {
                (count + 1, bytes + record.size_bytes)
            });

        StoreStats {
            live_artifacts,
            total_bytes,
            retention_seconds: self.inner.config.retention.as_secs(),
        }
    }
}

async fn discard_temp(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Artifact,
    Temp,
    Purge,
}

#[derive(Debug)]
struct DirEntry {
    id: String,
    kind: EntryKind,
    path: PathBuf,
    modified: Option<DateTime<Utc>>,
}

/// Map a file name to the id it belongs to. Unrelated files yield `None`.
fn classify(name: &str) -> Option<(&str, EntryKind)> {
    let (id, kind) = if let Some(hidden) = name.strip_prefix('.') {
        if let Some(id) = hidden.strip_suffix(TEMP_SUFFIX) {
            (id, EntryKind::Temp)
        } else {
            (hidden.strip_suffix(PURGE_SUFFIX)?, EntryKind::Purge)
        }
    } else {
        (name.strip_suffix(ARTIFACT_SUFFIX)?, EntryKind::Artifact)
    };

    id::is_valid_id(id).then_some((id, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const BASE_URL: &str = "http://localhost:8080/markdown-generator";

    async fn manual_store(dir: &TempDir) -> (ArtifactStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = StoreConfig::new(dir.path(), BASE_URL);
        let store = ArtifactStore::open_with_clock(config, clock.clone())
            .await
            .unwrap();
        (store, clock)
    }

    fn file_count(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;

        let content = "# Notes\n\nSome body text.\n\n";
        let descriptor = store.write(content, Some("Notes!")).await.unwrap();

        assert!(id::is_valid_id(&descriptor.id));
        assert_eq!(descriptor.url, format!("{}/downloads/{}", BASE_URL, descriptor.id));
        assert_eq!(descriptor.display_name, "notes.md");
        assert_eq!(descriptor.size_bytes, content.len() as u64);
        assert_eq!(descriptor.word_count, 4);
        assert_eq!(
            descriptor.expires_at - descriptor.created_at,
            chrono::Duration::seconds(3600)
        );

        let artifact = store.read(&descriptor.id).await.unwrap();
        assert_eq!(artifact.content, content.as_bytes());
        assert_eq!(artifact.record.display_name, "notes.md");
    }

    #[tokio::test]
    async fn test_storage_uses_id_not_display_name() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;

        let descriptor = store
            .write("payload", Some("../../escape attempt"))
            .await
            .unwrap();

        assert_eq!(descriptor.display_name, "escape-attempt.md");
        assert!(store.artifact_path(&descriptor.id).exists());
        assert_eq!(file_count(&dir), 1);
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;

        let err = store.write("", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(file_count(&dir), 0);
    }

    #[tokio::test]
    async fn test_read_unknown_and_malformed_ids() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;

        let unknown = id::generate_id();
        assert!(matches!(store.read(&unknown).await, Err(Error::NotFound(_))));
        assert!(matches!(store.read("../etc/passwd").await, Err(Error::NotFound(_))));
        assert!(matches!(store.read("a/b").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;

        let descriptor = store.write("boundary", None).await.unwrap();
        let just_before = descriptor.expires_at - chrono::Duration::milliseconds(1);

        assert!(store.read_at(&descriptor.id, just_before).await.is_ok());
        assert!(matches!(
            store.read_at(&descriptor.id, descriptor.expires_at).await,
            Err(Error::NotFound(_))
        ));

        assert_eq!(store.sweep(just_before).await, 0);
        assert_eq!(store.sweep(descriptor.expires_at).await, 1);
        assert!(matches!(
            store.read_at(&descriptor.id, just_before).await,
            Err(Error::NotFound(_))
        ));
        assert!(!store.artifact_path(&descriptor.id).exists());
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (store, clock) = manual_store(&dir).await;

        store.write("first", None).await.unwrap();
        store.write("second", None).await.unwrap();
        clock.advance(chrono::Duration::minutes(30));
        let fresh = store.write("third", None).await.unwrap();
        clock.advance(chrono::Duration::minutes(31));

        assert_eq!(store.sweep_now().await, 2);
        assert_eq!(store.sweep_now().await, 0);
        assert!(store.read(&fresh.id).await.is_ok());
        assert_eq!(file_count(&dir), 1);
    }

    #[tokio::test]
    async fn test_sweep_skips_entries_whose_file_vanished() {
        let dir = TempDir::new().unwrap();
        let (store, clock) = manual_store(&dir).await;

        let gone = store.write("gone", None).await.unwrap();
        let kept = store.write("kept", None).await.unwrap();
        std::fs::remove_file(store.artifact_path(&gone.id)).unwrap();
        clock.advance(chrono::Duration::hours(2));

        assert_eq!(store.sweep_now().await, 1);
        assert!(!store.artifact_path(&kept.id).exists());
    }

    #[tokio::test]
    async fn test_sweep_removes_stale_unindexed_files() {
        let dir = TempDir::new().unwrap();
        let (store, clock) = manual_store(&dir).await;

        let orphan = id::generate_id();
        let temp = id::generate_id();
        let purging = id::generate_id();
        std::fs::write(store.artifact_path(&orphan), "orphan").unwrap();
        std::fs::write(store.temp_path(&temp), "partial").unwrap();
        std::fs::write(store.purge_path(&purging), "mid-delete").unwrap();
        std::fs::write(dir.path().join("README.txt"), "not ours").unwrap();

        // Fresh strays are left alone; an in-flight write or sweep may own them.
        assert_eq!(store.sweep_now().await, 0);
        assert_eq!(file_count(&dir), 4);
        assert!(store.purge_path(&purging).exists());

        clock.advance(chrono::Duration::hours(2));
        assert_eq!(store.sweep_now().await, 1);
        assert!(!store.artifact_path(&orphan).exists());
        assert!(!store.temp_path(&temp).exists());
        assert!(!store.purge_path(&purging).exists());
        assert!(dir.path().join("README.txt").exists());
    }

    #[tokio::test]
    async fn test_open_adopts_previous_artifacts_and_clears_leftovers() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;
        let descriptor = store.write("survives restart", None).await.unwrap();

        let leftover = id::generate_id();
        std::fs::write(store.temp_path(&leftover), "half").unwrap();
        std::fs::write(store.purge_path(&leftover), "old").unwrap();
        drop(store);

        let reopened = ArtifactStore::open(StoreConfig::new(dir.path(), BASE_URL))
            .await
            .unwrap();

        let artifact = reopened.read(&descriptor.id).await.unwrap();
        assert_eq!(artifact.content, b"survives restart");
        assert_eq!(artifact.record.display_name, RECOVERED_DISPLAY_NAME);
        assert_eq!(artifact.record.word_count, 2);
        assert_eq!(file_count(&dir), 1);
    }

    #[tokio::test]
    async fn test_concurrent_writes_get_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.write(&format!("doc {}", i), None).await })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let descriptor = handle.await.unwrap().unwrap();
            ids.insert(descriptor.id);
        }
        assert_eq!(ids.len(), 16);
        assert_eq!(store.stats().await.live_artifacts, 16);
    }

    #[tokio::test]
    async fn test_stats_only_count_live_artifacts() {
        let dir = TempDir::new().unwrap();
        let (store, clock) = manual_store(&dir).await;

        store.write("12345", None).await.unwrap();
        clock.advance(chrono::Duration::minutes(90));
        store.write("123", None).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.live_artifacts, 1);
        assert_eq!(stats.total_bytes, 3);
        assert_eq!(stats.retention_seconds, 3600);
    }

    #[tokio::test]
    async fn test_timestamps_are_millisecond_aligned() {
        let dir = TempDir::new().unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(716_729_573);
        let clock = Arc::new(ManualClock::new(start));
        let store = ArtifactStore::open_with_clock(StoreConfig::new(dir.path(), BASE_URL), clock)
            .await
            .unwrap();

        let descriptor = store.write("aligned", None).await.unwrap();
        assert_eq!(descriptor.created_at.timestamp_subsec_nanos(), 716_000_000);
        assert_eq!(
            descriptor.expires_at,
            descriptor.created_at + chrono::Duration::seconds(3600)
        );

        let just_before = descriptor.expires_at - chrono::Duration::milliseconds(1);
        assert!(store.read_at(&descriptor.id, just_before).await.is_ok());
        assert!(matches!(
            store.read_at(&descriptor.id, descriptor.expires_at).await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(store.sweep(descriptor.expires_at).await, 1);
    }

    #[tokio::test]
    async fn test_write_failure_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let (store, _clock) = manual_store(&dir).await;

        std::fs::remove_dir_all(dir.path()).unwrap();
        let err = store.write("lost", Some("doc")).await.unwrap_err();
        assert!(matches!(err, Error::StorageWrite(_)));

        std::fs::create_dir_all(dir.path()).unwrap();
        assert_eq!(file_count(&dir), 0);
        assert_eq!(store.stats().await.live_artifacts, 0);

        let descriptor = store.write("kept", None).await.unwrap();
        assert!(store.read(&descriptor.id).await.is_ok());
        assert_eq!(file_count(&dir), 1);
    }

    #[test]
    fn test_classify() {
        let id = "0123456789abcdef0123456789abcdef";
        assert_eq!(classify(&format!("{id}.md")), Some((id, EntryKind::Artifact)));
        assert_eq!(classify(&format!(".{id}.tmp")), Some((id, EntryKind::Temp)));
        assert_eq!(classify(&format!(".{id}.purge")), Some((id, EntryKind::Purge)));
        assert_eq!(classify("notes.md"), None);
        assert_eq!(classify(&format!("{id}.txt")), None);
        assert_eq!(classify(".DS_Store"), None);
    }
}
