//! Remote record reconciliation against local storage.

use crate::error::SyncError;
use crate::local_store::{LocalStore, NewBookmark};
use std::sync::Arc;
use syncbridge_protocol::{DeviceId, ResolvedRecord, SyncAction, SyncRecord};
use tracing::{info, warn};

/// A per-record failure recorded during reconciliation.
#[derive(Debug)]
pub struct RecordFailure {
    /// Stable id of the record that failed.
    pub object_id: String,
    /// What went wrong.
    pub error: SyncError,
}

/// Outcome of reconciling one remote batch.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Pairs of remote record and local sync-facing record, one per
    /// record that resolved to a local entity.
    pub records: Vec<ResolvedRecord>,
    /// Number of records inserted locally.
    pub added: usize,
    /// Number of records already present locally.
    pub existing: usize,
    /// Records skipped because they carry no stable id.
    pub skipped_no_id: usize,
    /// Per-record failures. The rest of the batch still resolves.
    pub failures: Vec<RecordFailure>,
}

/// Merges remote record batches into local storage without duplication.
///
/// Every remote record is looked up by stable id before any insert, so at
/// most one local entity exists per id regardless of how often the same
/// record is fetched.
pub struct ReconciliationEngine {
    store: Arc<dyn LocalStore>,
}

impl ReconciliationEngine {
    /// Creates an engine over the given local store.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Reconciles a remote batch.
    ///
    /// Records without a stable id are skipped. Records absent locally
    /// with a creatable bookmark payload are inserted; records already
    /// present are left untouched. A record that fails to resolve is
    /// recorded in the outcome's failures and does not abort the batch.
    pub fn reconcile(
        &self,
        device_id: Option<&DeviceId>,
        remote: &[SyncRecord],
    ) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for record in remote {
            let Some(object_id) = record.object_id.as_deref() else {
                outcome.skipped_no_id += 1;
                continue;
            };

            let local = match self.store.get_by_sync_id(object_id) {
                Ok(local) => local,
                Err(error) => {
                    outcome.failures.push(RecordFailure {
                        object_id: object_id.to_string(),
                        error,
                    });
                    continue;
                }
            };

            let local = match local {
                Some(local) => {
                    outcome.existing += 1;
                    local
                }
                None if record.is_bookmark() && record.action != SyncAction::Delete => {
                    match self.store.insert(new_bookmark_from(record, object_id)) {
                        Ok(row) => {
                            outcome.added += 1;
                            row
                        }
                        Err(error) => {
                            outcome.failures.push(RecordFailure {
                                object_id: object_id.to_string(),
                                error,
                            });
                            continue;
                        }
                    }
                }
                None => {
                    outcome.failures.push(RecordFailure {
                        object_id: object_id.to_string(),
                        error: SyncError::RecordUnresolved {
                            object_id: object_id.to_string(),
                        },
                    });
                    continue;
                }
            };

            outcome.records.push(ResolvedRecord {
                remote: record.clone(),
                local: local.to_sync_record(device_id, SyncAction::Create),
            });
        }

        info!(
            added = outcome.added,
            existing = outcome.existing,
            skipped = outcome.skipped_no_id,
            "reconciled remote batch"
        );
        for failure in &outcome.failures {
            warn!(
                object_id = %failure.object_id,
                error = %failure.error,
                "record failed to reconcile"
            );
        }

        outcome
    }
}

fn new_bookmark_from(record: &SyncRecord, object_id: &str) -> NewBookmark {
    let bookmark = record.bookmark.as_ref();
    let site = bookmark.and_then(|b| b.site.as_ref());
    NewBookmark {
        sync_id: Some(object_id.to_string()),
        url: site.and_then(|s| s.location.clone()),
        title: site.and_then(|s| s.title.clone()),
        custom_title: site.and_then(|s| s.custom_title.clone()),
        created_at: site.and_then(|s| s.creation_time),
        last_accessed: site.and_then(|s| s.last_accessed_time),
        is_folder: bookmark.and_then(|b| b.is_folder).unwrap_or(false),
        parent_folder_sync_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryLocalStore;
    use syncbridge_protocol::{BookmarkRecord, ObjectKind, SiteRecord};

    fn bookmark_record(object_id: Option<&str>) -> SyncRecord {
        SyncRecord {
            object_id: object_id.map(str::to_string),
            device_id: None,
            action: SyncAction::Create,
            object_data: Some(ObjectKind::Bookmark),
            bookmark: Some(BookmarkRecord {
                site: Some(SiteRecord {
                    location: Some("https://example.com/".into()),
                    title: Some("Example".into()),
                    ..SiteRecord::default()
                }),
                is_folder: Some(false),
                parent_folder_object_id: None,
            }),
        }
    }

    fn engine_with_existing(ids: &[&str]) -> (ReconciliationEngine, Arc<MemoryLocalStore>) {
        let store = Arc::new(MemoryLocalStore::new());
        for id in ids {
            store
                .insert(NewBookmark {
                    sync_id: Some((*id).to_string()),
                    url: Some(format!("https://example.com/{id}")),
                    ..NewBookmark::default()
                })
                .unwrap();
        }
        (ReconciliationEngine::new(store.clone()), store)
    }

    #[test]
    fn mixed_batch_counts_and_pairs() {
        let (engine, store) = engine_with_existing(&["a", "b"]);
        let batch = vec![
            bookmark_record(Some("a")),
            bookmark_record(Some("b")),
            bookmark_record(Some("c")),
        ];

        let outcome = engine.reconcile(None, &batch);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.existing, 2);
        assert_eq!(outcome.records.len(), 3);
        assert!(outcome.failures.is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn missing_stable_id_is_skipped_without_affecting_others() {
        let (engine, _store) = engine_with_existing(&["a"]);
        let batch = vec![
            bookmark_record(Some("a")),
            bookmark_record(None),
            bookmark_record(Some("b")),
        ];

        let outcome = engine.reconcile(None, &batch);
        assert_eq!(outcome.skipped_no_id, 1);
        assert_eq!(outcome.existing, 1);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn duplicate_fetch_does_not_duplicate_rows() {
        let (engine, store) = engine_with_existing(&[]);
        let batch = vec![bookmark_record(Some("x"))];

        let first = engine.reconcile(None, &batch);
        assert_eq!(first.added, 1);

        let second = engine.reconcile(None, &batch);
        assert_eq!(second.added, 0);
        assert_eq!(second.existing, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn existing_rows_are_not_overwritten() {
        let (engine, store) = engine_with_existing(&["a"]);
        let before = store.rows();

        let mut record = bookmark_record(Some("a"));
        if let Some(site) = record.bookmark.as_mut().and_then(|b| b.site.as_mut()) {
            site.title = Some("Renamed Upstream".into());
        }
        let outcome = engine.reconcile(None, &[record]);

        assert_eq!(outcome.existing, 1);
        assert_eq!(store.rows(), before);
    }

    #[test]
    fn unresolvable_record_is_isolated() {
        let (engine, _store) = engine_with_existing(&[]);
        let no_payload = SyncRecord {
            object_id: Some("ghost".into()),
            action: SyncAction::Create,
            ..SyncRecord::default()
        };
        let batch = vec![no_payload, bookmark_record(Some("ok"))];

        let outcome = engine.reconcile(None, &batch);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].object_id, "ghost");
        assert!(matches!(
            outcome.failures[0].error,
            SyncError::RecordUnresolved { .. }
        ));
    }

    #[test]
    fn delete_action_does_not_create() {
        let (engine, store) = engine_with_existing(&[]);
        let mut record = bookmark_record(Some("gone"));
        record.action = SyncAction::Delete;

        let outcome = engine.reconcile(None, &[record]);
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.failures.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn resolved_pairs_carry_device_id() {
        let (engine, _store) = engine_with_existing(&[]);
        let device_id = DeviceId::new(vec![2]);

        let outcome = engine.reconcile(Some(&device_id), &[bookmark_record(Some("n"))]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.records[0].local.device_id.as_deref(),
            Some("[2]")
        );
        assert_eq!(outcome.records[0].local.action, SyncAction::Create);
        assert_eq!(outcome.records[0].remote.object_id.as_deref(), Some("n"));
    }
}
