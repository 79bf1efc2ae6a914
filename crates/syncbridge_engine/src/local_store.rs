//! Local bookmark storage collaborator.

use crate::error::SyncResult;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use syncbridge_protocol::{
    BookmarkRecord, DeviceId, ObjectKind, SiteRecord, SyncAction, SyncRecord,
};

/// A bookmark row owned by the local storage collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBookmark {
    /// Internal primary key.
    pub id: u64,
    /// Server-assigned stable id, once correlated.
    pub sync_id: Option<String>,
    /// Location URL.
    pub url: Option<String>,
    /// Page title.
    pub title: Option<String>,
    /// User-assigned title override.
    pub custom_title: Option<String>,
    /// Creation time in seconds.
    pub created_at: Option<f64>,
    /// Last accessed time in seconds.
    pub last_accessed: Option<f64>,
    /// Whether this entry is a folder.
    pub is_folder: bool,
    /// Stable id of the parent folder, if any.
    pub parent_folder_sync_id: Option<String>,
}

impl LocalBookmark {
    /// Renders this row in its sync-facing form.
    #[must_use]
    pub fn to_sync_record(&self, device_id: Option<&DeviceId>, action: SyncAction) -> SyncRecord {
        SyncRecord {
            object_id: self.sync_id.clone(),
            device_id: device_id.map(DeviceId::to_array_string),
            action,
            object_data: Some(ObjectKind::Bookmark),
            bookmark: Some(BookmarkRecord {
                site: Some(SiteRecord {
                    location: self.url.clone(),
                    title: self.title.clone(),
                    custom_title: self.custom_title.clone(),
                    creation_time: self.created_at,
                    last_accessed_time: self.last_accessed,
                }),
                is_folder: Some(self.is_folder),
                parent_folder_object_id: self.parent_folder_sync_id.clone(),
            }),
        }
    }
}

/// Fields for inserting a new local bookmark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBookmark {
    /// Server-assigned stable id to correlate with.
    pub sync_id: Option<String>,
    /// Location URL.
    pub url: Option<String>,
    /// Page title.
    pub title: Option<String>,
    /// User-assigned title override.
    pub custom_title: Option<String>,
    /// Creation time in seconds.
    pub created_at: Option<f64>,
    /// Last accessed time in seconds.
    pub last_accessed: Option<f64>,
    /// Whether this entry is a folder.
    pub is_folder: bool,
    /// Stable id of the parent folder, if any.
    pub parent_folder_sync_id: Option<String>,
}

/// Local record storage keyed by stable sync id.
///
/// Calls are synchronous from the engine's viewpoint and are only made
/// from the session sequencer's context.
pub trait LocalStore: Send + Sync {
    /// Looks up a bookmark by its stable sync id.
    fn get_by_sync_id(&self, sync_id: &str) -> SyncResult<Option<LocalBookmark>>;

    /// Inserts a new bookmark and returns the stored row.
    fn insert(&self, bookmark: NewBookmark) -> SyncResult<LocalBookmark>;
}

/// An in-memory local store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    rows: RwLock<Vec<LocalBookmark>>,
    next_id: AtomicU64,
}

impl MemoryLocalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every stored row.
    #[must_use]
    pub fn rows(&self) -> Vec<LocalBookmark> {
        self.rows.read().clone()
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_by_sync_id(&self, sync_id: &str) -> SyncResult<Option<LocalBookmark>> {
        Ok(self
            .rows
            .read()
            .iter()
            .find(|row| row.sync_id.as_deref() == Some(sync_id))
            .cloned())
    }

    fn insert(&self, bookmark: NewBookmark) -> SyncResult<LocalBookmark> {
        let row = LocalBookmark {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            sync_id: bookmark.sync_id,
            url: bookmark.url,
            title: bookmark.title,
            custom_title: bookmark.custom_title,
            created_at: bookmark.created_at,
            last_accessed: bookmark.last_accessed,
            is_folder: bookmark.is_folder,
            parent_folder_sync_id: bookmark.parent_folder_sync_id,
        };
        self.rows.write().push(row.clone());
        Ok(row)
    }
}
