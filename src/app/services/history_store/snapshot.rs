//! JSON snapshots of the history store

use crate::app::models::UploadSummary;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshot layout version written to disk
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serializable copy of the history, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub format_version: u32,
    pub entries: Vec<UploadSummary>,
}

impl HistorySnapshot {
    pub fn new(entries: Vec<UploadSummary>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            entries,
        }
    }

    /// Check version and that identities are strictly increasing
    pub fn validate(&self) -> Result<()> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(Error::configuration(format!(
                "Unsupported history snapshot version {} (expected {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        for pair in self.entries.windows(2) {
            if pair[1].uploaded_at <= pair[0].uploaded_at {
                return Err(Error::data_validation(format!(
                    "History snapshot out of order: {} follows {}",
                    pair[1].id(),
                    pair[0].id()
                )));
            }
        }

        Ok(())
    }

    /// Read a snapshot file
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read history snapshot {}", path.display()),
                e,
            )
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::serialization(
                format!("Invalid history snapshot {}", path.display()),
                e,
            )
        })
    }

    /// Write the snapshot atomically: a temp file in the same directory is
    /// renamed over the target.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::io(format!("Failed to create {}", dir.display()), e))?;

        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| Error::serialization("Failed to serialize history snapshot", e))?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| Error::io("Failed to create temporary snapshot file", e))?;
        temp.write_all(&json)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Error::io("Failed to write temporary snapshot file", e))?;
        temp.persist(path).map_err(|e| {
            Error::io(
                format!("Failed to replace history snapshot {}", path.display()),
                e.error,
            )
        })?;

        debug!(
            "Wrote {} summaries to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }
}

/// Exclusive lock on a snapshot, held by a `<snapshot>.lock` file next to it
///
/// Every process appending to the same snapshot takes this lock first, so
/// read-modify-write cycles on the file never interleave. Dropping the guard
/// closes the file, which releases the lock.
#[derive(Debug)]
pub struct SnapshotLock {
    _file: File,
}

impl SnapshotLock {
    /// Block until the lock for `snapshot_path` is held
    pub fn acquire(snapshot_path: &Path) -> Result<Self> {
        let path = lock_path(snapshot_path);
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::io(format!("Failed to create {}", dir.display()), e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| Error::io(format!("Failed to open lock file {}", path.display()), e))?;
        file.lock()
            .map_err(|e| Error::io(format!("Failed to lock {}", path.display()), e))?;

        debug!("Locked {}", path.display());
        Ok(Self { _file: file })
    }
}

/// `history.json` is locked through `history.json.lock`
pub fn lock_path(snapshot_path: &Path) -> PathBuf {
    let mut name = OsString::from(snapshot_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
