//! Snapshot file store
//!
//! Loads a JSON export of the host's states and objects, serves the engine
//! from memory and writes everything back on [`SnapshotStore::flush`].
//! Messages for other instances land in the file's `outbox` for a relay to
//! pick up.

use super::memory::MemoryStore;
use super::traits::{MessageBus, ObjectMeta, ObjectStore, StateSample, StateStore};
use crate::error::StoreError;

use serde_json::Value;
use std::path::{Path, PathBuf};

/// File-backed store
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    inner: MemoryStore,
    dirty: bool,
}

impl SnapshotStore {
    /// Open an existing snapshot file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Snapshot {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let inner: MemoryStore = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded snapshot {} with {} states",
            path.display(),
            inner.state_count()
        );

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            dirty: false,
        })
    }

    /// Write pending changes back to the file
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let content = serde_json::to_string_pretty(&self.inner)?;
        std::fs::write(&self.path, content).map_err(|e| StoreError::Snapshot {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        self.dirty = false;
        log::debug!("Wrote snapshot {}", self.path.display());
        Ok(())
    }

    /// Whether writes are pending
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for SnapshotStore {
    fn state(&self, id: &str) -> Result<Option<StateSample>, StoreError> {
        self.inner.state(id)
    }

    fn states_matching(&self, pattern: &str) -> Result<Vec<(String, StateSample)>, StoreError> {
        self.inner.states_matching(pattern)
    }

    fn set_state(&mut self, id: &str, val: Value, ack: bool) -> Result<(), StoreError> {
        self.dirty = true;
        self.inner.set_state(id, val, ack)
    }
}

impl ObjectStore for SnapshotStore {
    fn object(&self, id: &str) -> Result<Option<ObjectMeta>, StoreError> {
        self.inner.object(id)
    }
}

impl MessageBus for SnapshotStore {
    fn send_to(
        &mut self,
        instance: &str,
        command: &str,
        payload: &Value,
    ) -> Result<(), StoreError> {
        self.dirty = true;
        self.inner.send_to(instance, command, payload)
    }
}
