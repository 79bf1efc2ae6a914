//! Write-once seed and device identity persistence.

use crate::error::{SyncError, SyncResult};
use crate::state_store::{StateStore, DEVICE_ID_KEY, SEED_KEY};
use std::sync::Arc;
use syncbridge_niceware::Wordlist;
use syncbridge_protocol::{DeviceId, SeedMaterial};

/// Persists the sync seed and device id through a [`StateStore`].
///
/// The seed is write-once: joining a new sync group requires an explicit
/// [`SeedStore::clear`] first. This keeps one installation from silently
/// straddling two sync groups.
pub struct SeedStore {
    store: Arc<dyn StateStore>,
}

impl SeedStore {
    /// Creates a seed store over the given persisted slots.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Returns the active seed, if one is stored.
    pub fn seed(&self) -> SyncResult<Option<SeedMaterial>> {
        match self.store.get(SEED_KEY)? {
            Some(text) => Ok(Some(SeedMaterial::from_array_string(&text)?)),
            None => Ok(None),
        }
    }

    /// Stores the seed for this installation.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::SeedAlreadySet`] when a seed is already
    /// stored; the existing seed is left unchanged.
    pub fn set_seed(&self, seed: &SeedMaterial) -> SyncResult<()> {
        if self.store.get(SEED_KEY)?.is_some() {
            return Err(SyncError::SeedAlreadySet);
        }
        self.store.set(SEED_KEY, &seed.to_array_string())
    }

    /// Returns the persisted device id, if assigned.
    pub fn device_id(&self) -> SyncResult<Option<DeviceId>> {
        match self.store.get(DEVICE_ID_KEY)? {
            Some(text) => Ok(Some(DeviceId::from_array_string(&text)?)),
            None => Ok(None),
        }
    }

    /// Stores the device id assigned by the sync service.
    pub fn set_device_id(&self, device_id: &DeviceId) -> SyncResult<()> {
        self.store.set(DEVICE_ID_KEY, &device_id.to_array_string())
    }

    /// Removes the seed and device id. This is the disconnect path.
    pub fn clear(&self) -> SyncResult<()> {
        self.store.remove(SEED_KEY)?;
        self.store.remove(DEVICE_ID_KEY)
    }

    /// Returns true when a seed is stored.
    pub fn is_connected(&self) -> SyncResult<bool> {
        Ok(self.store.get(SEED_KEY)?.is_some())
    }

    /// Renders the active seed as a transcribable passphrase.
    pub fn seed_as_passphrase(&self, wordlist: &Wordlist) -> SyncResult<Option<Vec<String>>> {
        match self.seed()? {
            Some(seed) => Ok(Some(wordlist.passphrase_from_bytes(seed.as_bytes())?)),
            None => Ok(None),
        }
    }
}
