//! Store implementation
//!
//! HashMap guarded by a reentrant mutex, paired with its snapshot.

use std::cell::RefCell;

use parking_lot::ReentrantMutex;

use crate::error::Result;
use crate::persistence::{LoadOutcome, Snapshot, SnapshotMap};

/// In-memory store with write-through snapshot persistence
///
/// ## Concurrency:
/// - `data`: `ReentrantMutex` gives shared access, so the map sits in a
///   `RefCell`. Borrows never outlive a single method call.
/// - The lock is reentrant so `persist` can be called both on its own and
///   from inside a mutation that already holds the lock.
pub struct Store {
    data: ReentrantMutex<RefCell<SnapshotMap>>,
    snapshot: Snapshot,
}

impl Store {
    /// Create an empty store backed by `snapshot` (nothing is loaded)
    pub fn new(snapshot: Snapshot) -> Self {
        Self::with_data(snapshot, SnapshotMap::new())
    }

    /// Create a store populated from `snapshot`
    pub fn open(snapshot: Snapshot) -> (Self, LoadOutcome) {
        let (data, outcome) = snapshot.recover();
        (Self::with_data(snapshot, data), outcome)
    }

    fn with_data(snapshot: Snapshot, data: SnapshotMap) -> Self {
        Self {
            data: ReentrantMutex::new(RefCell::new(data)),
            snapshot,
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<String> {
        let guard = self.data.lock();
        let map = guard.borrow();
        map.get(key).cloned()
    }

    /// Snapshot of the current keys (unspecified order)
    pub fn keys(&self) -> Vec<String> {
        let guard = self.data.lock();
        let map = guard.borrow();
        map.keys().cloned().collect()
    }

    /// Insert or overwrite `key`, then persist
    ///
    /// If persisting fails the in-memory value is still updated.
    pub fn set(&self, key: String, value: String) -> Result<()> {
        let guard = self.data.lock();
        guard.borrow_mut().insert(key, value);
        self.persist()
    }

    /// Remove `key` if present
    ///
    /// Returns whether the key existed. The snapshot is only rewritten when
    /// something was removed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let guard = self.data.lock();
        let existed = guard.borrow_mut().remove(key).is_some();
        if existed {
            self.persist()?;
        }
        Ok(existed)
    }

    /// Write the full map to the snapshot under the store lock
    pub fn persist(&self) -> Result<()> {
        let guard = self.data.lock();
        let map = guard.borrow();
        self.snapshot.save(&map)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        let guard = self.data.lock();
        let map = guard.borrow();
        map.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The snapshot backing this store
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}
