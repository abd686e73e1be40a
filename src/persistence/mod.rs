//! Persistence Module
//!
//! Durable on-disk copy of the store.
//!
//! ## Responsibilities
//! - Rewrite the whole store on every mutation
//! - Atomic replacement (temp file, fsync, rename)
//! - Best-effort load at startup
//!
//! ## File Format
//! A single UTF-8 JSON object, flat string-to-string, no envelope:
//! ```text
//! {"foo":"bar","a":"1"}
//! ```
//!
//! ## Replacement Protocol
//! ```text
//! db.json.tmp  ── write ── flush ── fsync ──┐
//!                                           ▼
//! db.json      ◄──────────── rename ────────┘
//! ```
//! A reader opening `db.json` by name sees either the previous or the new
//! snapshot, never a partial write.

mod writer;
mod recovery;

pub use recovery::LoadOutcome;

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Flat mapping persisted by a snapshot
pub type SnapshotMap = HashMap<String, String>;

/// Handle on the snapshot file at a fixed path
#[derive(Debug)]
pub struct Snapshot {
    /// Target snapshot path (`db.json`)
    path: PathBuf,

    /// Sibling temp path (`db.json.tmp`)
    tmp_path: PathBuf,

    /// Number of completed saves
    saves: AtomicU64,
}

impl Snapshot {
    /// Create a handle for the snapshot at `path`
    ///
    /// Nothing is touched on disk until `save` or `load` is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp_name = OsString::from(path.as_os_str());
        tmp_name.push(".tmp");

        Self {
            path,
            tmp_path: PathBuf::from(tmp_name),
            saves: AtomicU64::new(0),
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temporary file used during `save`
    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Number of snapshots written through this handle
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }

    fn record_save(&self) {
        self.saves.fetch_add(1, Ordering::Relaxed);
    }
}
