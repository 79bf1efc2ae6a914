//! Persisted key-value slots backing the seed store.

use crate::error::{SyncError, SyncResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Key for the persisted device id slot.
pub const DEVICE_ID_KEY: &str = "device-id";
/// Key for the persisted seed slot.
pub const SEED_KEY: &str = "seed";

/// Persisted string slots.
///
/// The engine stores the seed and device id as opaque textual byte arrays
/// in two named slots; everything else about the persistence medium is the
/// collaborator's business.
pub trait StateStore: Send + Sync {
    /// Reads a slot.
    fn get(&self, key: &str) -> SyncResult<Option<String>>;

    /// Writes a slot.
    fn set(&self, key: &str, value: &str) -> SyncResult<()>;

    /// Clears a slot.
    fn remove(&self, key: &str) -> SyncResult<()>;
}

/// An in-memory state store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        self.slots.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SyncResult<()> {
        self.slots.write().remove(key);
        Ok(())
    }
}

/// A file-backed state store persisting slots as one JSON object.
///
/// Writes go to a sibling temporary file first and are renamed into
/// place, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    slots: RwLock<HashMap<String, String>>,
}

impl FileStateStore {
    /// Opens a store at `path`, loading existing slots if the file exists.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::StateStore`] on unreadable or unparsable
    /// contents.
    pub fn open(path: impl Into<PathBuf>) -> SyncResult<Self> {
        let path = path.into();
        let slots = if path.exists() {
            let text = fs::read_to_string(&path)
                .map_err(|e| SyncError::StateStore(format!("read {}: {e}", path.display())))?;
            serde_json::from_str(&text)
                .map_err(|e| SyncError::StateStore(format!("parse {}: {e}", path.display())))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            slots: RwLock::new(slots),
        })
    }

    fn persist(&self, slots: &HashMap<String, String>) -> SyncResult<()> {
        let text = serde_json::to_string_pretty(slots)
            .map_err(|e| SyncError::StateStore(format!("serialize slots: {e}")))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)
            .map_err(|e| SyncError::StateStore(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| SyncError::StateStore(format!("rename {}: {e}", self.path.display())))?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        let mut slots = self.slots.write();
        slots.insert(key.to_string(), value.to_string());
        self.persist(&slots)
    }

    fn remove(&self, key: &str) -> SyncResult<()> {
        let mut slots = self.slots.write();
        slots.remove(key);
        self.persist(&slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStateStore::new();
        assert_eq!(store.get(SEED_KEY).unwrap(), None);

        store.set(SEED_KEY, "[1, 2]").unwrap();
        assert_eq!(store.get(SEED_KEY).unwrap().as_deref(), Some("[1, 2]"));

        store.remove(SEED_KEY).unwrap();
        assert_eq!(store.get(SEED_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");

        {
            let store = FileStateStore::open(&path).unwrap();
            store.set(DEVICE_ID_KEY, "[3]").unwrap();
            store.set(SEED_KEY, "[9, 9]").unwrap();
        }

        let store = FileStateStore::open(&path).unwrap();
        assert_eq!(store.get(DEVICE_ID_KEY).unwrap().as_deref(), Some("[3]"));
        assert_eq!(store.get(SEED_KEY).unwrap().as_deref(), Some("[9, 9]"));
    }

    #[test]
    fn file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");

        let store = FileStateStore::open(&path).unwrap();
        store.set(SEED_KEY, "[1]").unwrap();
        store.remove(SEED_KEY).unwrap();
        drop(store);

        let store = FileStateStore::open(&path).unwrap();
        assert_eq!(store.get(SEED_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync-state.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStateStore::open(&path),
            Err(SyncError::StateStore(_))
        ));
    }
}
