//! History store for upload summaries
//!
//! The store is the only shared mutable state in the engine. It is an
//! explicit component injected into the pipeline (as `Arc<dyn HistoryStore>`)
//! with a narrow contract:
//!
//! - `append` is the only mutation and assigns each summary its `uploaded_at`
//!   identity. Appends are serialized behind a single write lock, so ids are
//!   unique and strictly increasing even when uploads arrive together.
//! - `list`, `get` and `latest_pair` take the read lock and hand out shared
//!   `Arc`s, so a reader never sees a half-written summary.
//!
//! Retention (how many summaries are kept, which keep their equipment list)
//! is configured through [`HistoryConfig`]. When a snapshot path is
//! configured, every append is written through to disk before it becomes
//! visible. Appends then hold a lock file next to the snapshot and start
//! from the file's contents, so stores in other processes sharing the path
//! never overwrite each other's uploads.

use crate::app::models::{PendingSummary, UploadSummary, format_upload_id, parse_upload_id};
use crate::config::HistoryConfig;
use crate::{Error, Result};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

pub mod retention;
pub mod snapshot;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use snapshot::{HistorySnapshot, SNAPSHOT_FORMAT_VERSION, SnapshotLock};

/// A stored summary and the one stored directly before it
#[derive(Debug, Clone)]
pub struct Appended {
    pub summary: Arc<UploadSummary>,

    /// The newest summary at the moment of the append, if any
    pub previous: Option<Arc<UploadSummary>>,
}

/// Append-only store of upload summaries
pub trait HistoryStore: Send + Sync {
    /// Store a summary, assigning its `uploaded_at` identity, and return it
    /// with its predecessor as seen under the same lock
    fn append_entry(&self, pending: PendingSummary) -> Result<Appended>;

    /// Store a summary, assigning its `uploaded_at` identity
    fn append(&self, pending: PendingSummary) -> Result<Arc<UploadSummary>> {
        self.append_entry(pending).map(|appended| appended.summary)
    }

    /// Most recent `limit` summaries, newest first
    fn list(&self, limit: usize) -> Vec<Arc<UploadSummary>>;

    /// Summary stored under the given timestamp
    fn get(&self, uploaded_at: &DateTime<Utc>) -> Result<Arc<UploadSummary>>;

    /// Number of stored summaries
    fn len(&self) -> usize;

    /// `(latest, previous)` when at least two summaries are stored
    fn latest_pair(&self) -> Option<(Arc<UploadSummary>, Arc<UploadSummary>)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent summary
    fn latest(&self) -> Option<Arc<UploadSummary>> {
        self.list(1).into_iter().next()
    }

    /// Look up a summary by its rendered id
    fn get_by_id(&self, id: &str) -> Result<Arc<UploadSummary>> {
        self.get(&parse_upload_id(id)?)
    }
}

/// In-memory history store, optionally written through to a JSON snapshot
#[derive(Debug)]
pub struct InMemoryHistoryStore {
    /// Oldest first
    entries: RwLock<VecDeque<Arc<UploadSummary>>>,

    config: HistoryConfig,
}

impl InMemoryHistoryStore {
    /// Create an empty store
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Open the store, restoring the snapshot at the configured path if it exists
    pub fn open(config: HistoryConfig) -> Result<Self> {
        config.validate()?;

        match &config.path {
            Some(path) if path.exists() => {
                let snapshot = HistorySnapshot::read_from(path)?;
                info!(
                    "Restored {} upload summaries from {}",
                    snapshot.entries.len(),
                    path.display()
                );
                Self::from_snapshot(config, snapshot)
            }
            _ => Ok(Self::new(config)),
        }
    }

    /// Build a store from a snapshot, applying the configured retention
    pub fn from_snapshot(config: HistoryConfig, snapshot: HistorySnapshot) -> Result<Self> {
        snapshot.validate()?;

        let mut entries: VecDeque<Arc<UploadSummary>> =
            snapshot.entries.into_iter().map(Arc::new).collect();
        retention::apply(&mut entries, &config);

        Ok(Self {
            entries: RwLock::new(entries),
            config,
        })
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> HistorySnapshot {
        let entries = self.read();
        HistorySnapshot::new(entries.iter().map(|s| s.as_ref().clone()).collect())
    }

    /// Store configuration
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Current file contents; another process may have appended since this
    /// store last wrote
    fn reload(&self, path: &Path) -> Result<VecDeque<Arc<UploadSummary>>> {
        let snapshot = HistorySnapshot::read_from(path)?;
        snapshot.validate()?;
        Ok(snapshot.entries.into_iter().map(Arc::new).collect())
    }

    // A panic while holding the lock cannot leave a half-applied append
    // behind (the deque is swapped in whole), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<Arc<UploadSummary>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<Arc<UploadSummary>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Next identity: now, but never at or before the last one
fn next_upload_time(last: Option<&DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    match last {
        Some(last) if now <= *last => *last + Duration::microseconds(1),
        _ => now,
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append_entry(&self, pending: PendingSummary) -> Result<Appended> {
        let mut entries = self.write();

        let _file_lock = match &self.config.path {
            Some(path) => Some(SnapshotLock::acquire(path)?),
            None => None,
        };
        let mut updated = match &self.config.path {
            Some(path) if path.exists() => self.reload(path)?,
            _ => entries.clone(),
        };

        let previous = updated.back().cloned();
        let uploaded_at = next_upload_time(previous.as_ref().map(|s| &s.uploaded_at));
        let summary = Arc::new(retention::prepare_new(
            UploadSummary::from_pending(uploaded_at, pending),
            &self.config,
        ));

        updated.push_back(Arc::clone(&summary));
        retention::apply(&mut updated, &self.config);

        if let Some(path) = &self.config.path {
            let snapshot =
                HistorySnapshot::new(updated.iter().map(|s| s.as_ref().clone()).collect());
            snapshot.write_to(path)?;
        }

        *entries = updated;
        debug!(
            "Stored upload {} ({} summaries held)",
            summary.id(),
            entries.len()
        );

        Ok(Appended { summary, previous })
    }

    fn list(&self, limit: usize) -> Vec<Arc<UploadSummary>> {
        self.read().iter().rev().take(limit).cloned().collect()
    }

    fn get(&self, uploaded_at: &DateTime<Utc>) -> Result<Arc<UploadSummary>> {
        let entries = self.read();
        entries
            .binary_search_by(|s| s.uploaded_at.cmp(uploaded_at))
            .map(|index| Arc::clone(&entries[index]))
            .map_err(|_| Error::not_found(format_upload_id(uploaded_at)))
    }

    fn len(&self) -> usize {
        self.read().len()
    }

    fn latest_pair(&self) -> Option<(Arc<UploadSummary>, Arc<UploadSummary>)> {
        let entries = self.read();
        let mut newest = entries.iter().rev();
        let latest = newest.next()?;
        let previous = newest.next()?;
        Some((Arc::clone(latest), Arc::clone(previous)))
    }
}
