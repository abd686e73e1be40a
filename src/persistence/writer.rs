//! Snapshot writer
//!
//! Atomic full rewrite of the snapshot file.

use std::fs::{self, File};
use std::io::Write;

use crate::error::Result;
use super::{Snapshot, SnapshotMap};

impl Snapshot {
    /// Serialize `map` and atomically replace the snapshot
    ///
    /// Steps:
    /// 1. Serialize the map to JSON bytes
    /// 2. Write and fsync the temp file
    /// 3. Rename the temp file onto the snapshot path
    ///
    /// Cost is proportional to the full map on every call.
    pub fn save(&self, map: &SnapshotMap) -> Result<()> {
        // Step 1: Serialize in memory so disk failures surface as plain I/O
        let bytes = serde_json::to_vec(map)?;

        // Step 2: Write the temp file and force it to stable storage
        let mut file = File::create(&self.tmp_path)?;
        file.write_all(&bytes)?;
        file.flush()?;
        file.sync_all()?;
        drop(file);

        // Step 3: Atomic replace
        fs::rename(&self.tmp_path, &self.path)?;

        self.record_save();
        tracing::trace!("Snapshot saved: {} keys -> {}", map.len(), self.path.display());

        Ok(())
    }
}
