//! Snapshot recovery
//!
//! Loads the snapshot at startup. Every failure degrades to an empty map.

use std::fs::File;
use std::io::BufReader;

use super::{Snapshot, SnapshotMap};

/// What `recover` found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot parsed successfully
    Loaded { keys: usize },

    /// No snapshot file at the path
    Missing,

    /// Snapshot present but unreadable or not a flat string object.
    /// Its contents are discarded.
    Corrupt,
}

impl Snapshot {
    /// Load the snapshot, or an empty map if it is missing or corrupt
    pub fn load(&self) -> SnapshotMap {
        self.recover().0
    }

    /// Load the snapshot and report what happened
    ///
    /// Never fails: a corrupt snapshot yields an empty map and
    /// `LoadOutcome::Corrupt`. Callers do not escalate this.
    pub fn recover(&self) -> (SnapshotMap, LoadOutcome) {
        if !self.path.exists() {
            return (SnapshotMap::new(), LoadOutcome::Missing);
        }

        let parsed = File::open(&self.path)
            .map_err(crate::KvError::from)
            .and_then(|file| {
                serde_json::from_reader::<_, SnapshotMap>(BufReader::new(file))
                    .map_err(crate::KvError::from)
            });

        match parsed {
            Ok(map) => {
                let keys = map.len();
                (map, LoadOutcome::Loaded { keys })
            }
            Err(_) => (SnapshotMap::new(), LoadOutcome::Corrupt),
        }
    }
}
