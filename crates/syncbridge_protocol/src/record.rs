//! Sync record types exchanged with the remote bridge.

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// Categories of records the sync service exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordCategory {
    /// Bookmark records.
    #[serde(rename = "BOOKMARKS")]
    Bookmarks,
    /// Browsing history records.
    #[serde(rename = "HISTORY_SITES")]
    HistorySites,
    /// Preference records.
    #[serde(rename = "PREFERENCES")]
    Preferences,
}

impl RecordCategory {
    /// Returns the wire name for this category.
    #[must_use]
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            RecordCategory::Bookmarks => "BOOKMARKS",
            RecordCategory::HistorySites => "HISTORY_SITES",
            RecordCategory::Preferences => "PREFERENCES",
        }
    }

    /// Parses a wire category name.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::UnknownCategory`] for anything else.
    pub fn from_wire_str(name: &str) -> Result<Self, ProtocolError> {
        match name {
            "BOOKMARKS" => Ok(RecordCategory::Bookmarks),
            "HISTORY_SITES" => Ok(RecordCategory::HistorySites),
            "PREFERENCES" => Ok(RecordCategory::Preferences),
            other => Err(ProtocolError::UnknownCategory(other.to_string())),
        }
    }
}

/// Action carried by a sync record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SyncAction {
    /// Record was created.
    #[default]
    Create,
    /// Record was updated.
    Update,
    /// Record was deleted.
    Delete,
}

impl SyncAction {
    /// Converts to the numeric wire code.
    #[must_use]
    pub fn to_code(&self) -> i64 {
        match self {
            SyncAction::Create => 0,
            SyncAction::Update => 1,
            SyncAction::Delete => 2,
        }
    }

    /// Converts from a numeric wire code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SyncAction::Create),
            1 => Some(SyncAction::Update),
            2 => Some(SyncAction::Delete),
            _ => None,
        }
    }
}

impl From<SyncAction> for i64 {
    fn from(action: SyncAction) -> Self {
        action.to_code()
    }
}

impl TryFrom<i64> for SyncAction {
    type Error = ProtocolError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        SyncAction::from_code(code).ok_or(ProtocolError::UnknownAction(code))
    }
}

/// Payload shape attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    /// A bookmark payload.
    Bookmark,
    /// A history site payload.
    HistorySite,
    /// A site-settings payload.
    SiteSetting,
    /// A device payload.
    Device,
    /// A payload shape this version does not know.
    Unknown,
}

impl ObjectKind {
    /// Returns the wire name for this payload shape.
    #[must_use]
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            ObjectKind::Bookmark => "bookmark",
            ObjectKind::HistorySite => "historySite",
            ObjectKind::SiteSetting => "siteSetting",
            ObjectKind::Device => "device",
            ObjectKind::Unknown => "unknown",
        }
    }
}

impl From<String> for ObjectKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bookmark" => ObjectKind::Bookmark,
            "historySite" => ObjectKind::HistorySite,
            "siteSetting" => ObjectKind::SiteSetting,
            "device" => ObjectKind::Device,
            _ => ObjectKind::Unknown,
        }
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        kind.as_wire_str().to_string()
    }
}

/// Site fields nested inside a bookmark payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteRecord {
    /// Location URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Page title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// User-assigned title override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    /// Creation time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<f64>,
    /// Last accessed time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_time: Option<f64>,
}

/// Bookmark payload of a sync record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkRecord {
    /// The bookmarked site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteRecord>,
    /// Whether this entry is a folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_folder: Option<bool>,
    /// Stable id of the parent folder, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder_object_id: Option<String>,
}

/// One record exchanged with the sync service.
///
/// `object_id` is assigned by the remote bridge on first successful create;
/// local-only records lack it until acknowledged, and such records cannot
/// be correlated during reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRecord {
    /// Server-assigned stable id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Device the record originated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Action this record conveys.
    pub action: SyncAction,
    /// Payload shape discriminator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_data: Option<ObjectKind>,
    /// Bookmark payload, when `object_data` is a bookmark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<BookmarkRecord>,
}

impl SyncRecord {
    /// Returns true when this record carries a usable bookmark payload.
    #[must_use]
    pub fn is_bookmark(&self) -> bool {
        self.object_data == Some(ObjectKind::Bookmark) && self.bookmark.is_some()
    }
}
