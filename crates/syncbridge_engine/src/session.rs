//! The sync session: inbound dispatch, readiness side effects, and
//! deferred outbound traffic.

use crate::bridge::BridgeSink;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::local_store::LocalStore;
use crate::readiness::{ReadinessGate, ReadinessVector};
use crate::reconcile::ReconciliationEngine;
use crate::seed_store::SeedStore;
use crate::state_store::StateStore;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use syncbridge_protocol::{
    DeviceId, InboundMessage, InitConfig, OutboundCall, ReadyFlag, RecordCategory, SeedMaterial,
    SyncRecord,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One sync session against the remote bridge.
///
/// The session is the single owner of the sync pipeline: inbound messages
/// are processed to completion one at a time, the readiness gate is
/// re-evaluated after every message, and outbound record traffic suspends
/// until the gate opens. Build one session per connection and drop it on
/// teardown; the periodic fetch task is aborted when the session shuts
/// down.
pub struct SyncSession {
    config: SyncConfig,
    gate: ReadinessGate,
    seeds: SeedStore,
    reconciler: ReconciliationEngine,
    bridge: Arc<dyn BridgeSink>,
    dispatch: tokio::sync::Mutex<()>,
    fetch_task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl SyncSession {
    /// Creates a session over the given collaborators.
    pub fn new(
        config: SyncConfig,
        state_store: Arc<dyn StateStore>,
        local_store: Arc<dyn LocalStore>,
        bridge: Arc<dyn BridgeSink>,
    ) -> Self {
        Self {
            config,
            gate: ReadinessGate::new(),
            seeds: SeedStore::new(state_store),
            reconciler: ReconciliationEngine::new(local_store),
            bridge,
            dispatch: tokio::sync::Mutex::new(()),
            fetch_task: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Joins an existing sync group with transcribed seed material.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::SeedAlreadySet`] when this installation is
    /// already in a sync group; disconnect first.
    pub fn join_sync_group(&self, seed: &SeedMaterial) -> SyncResult<()> {
        self.seeds.set_seed(seed)?;
        info!("joined sync group");
        Ok(())
    }

    /// Prepares to create a new sync group.
    ///
    /// The bridge generates the seed and delivers it via `save-init-data`;
    /// this only verifies no group is active yet.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::SeedAlreadySet`] when a seed is stored.
    pub fn create_sync_group(&self) -> SyncResult<()> {
        if self.seeds.is_connected()? {
            return Err(SyncError::SeedAlreadySet);
        }
        Ok(())
    }

    /// Leaves the sync group: stops background work and destroys the
    /// stored seed and device id.
    pub fn disconnect(&self) -> SyncResult<()> {
        self.shutdown();
        self.seeds.clear()
    }

    /// Stops the periodic fetch task and refuses further traffic.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(task) = self.fetch_task.lock().take() {
            task.abort();
        }
    }

    /// Returns whether the readiness latch has opened.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Returns a snapshot of the readiness flags.
    #[must_use]
    pub fn readiness(&self) -> ReadinessVector {
        self.gate.snapshot()
    }

    /// Returns the seed store for passphrase display and connection checks.
    #[must_use]
    pub fn seed_store(&self) -> &SeedStore {
        &self.seeds
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Handles one raw inbound bridge message.
    ///
    /// Messages are processed one at a time; overlapping calls queue on an
    /// internal lock. Malformed messages are logged and dropped without
    /// error. The readiness gate is re-evaluated after every message, and
    /// the one message that opens it triggers the ready side effects: an
    /// immediate fetch, then the periodic fetch task.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::SessionClosed`] after shutdown; handler
    /// failures (store or bridge errors) propagate to the caller.
    pub async fn handle_inbound(&self, raw: &str) -> SyncResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SyncError::SessionClosed);
        }
        let _guard = self.dispatch.lock().await;

        let message = match InboundMessage::parse(raw) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "dropping malformed bridge message");
                return Ok(());
            }
        };

        let result = self.dispatch_message(message);
        if self.gate.evaluate() {
            self.on_ready().await;
        }
        result
    }

    /// Uploads a batch of local records once the session is ready.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::NotReadyTimeout`] when the readiness budget
    /// is spent before the gate opens.
    pub async fn send_records(
        &self,
        category: RecordCategory,
        records: Vec<SyncRecord>,
    ) -> SyncResult<()> {
        self.wait_until_ready().await?;
        self.bridge.send(&OutboundCall::SendRecords { category, records })
    }

    /// Requests records changed since `start_at_seconds` once the session
    /// is ready.
    ///
    /// The bridge answers with a `get-existing-objects` message rather
    /// than returning records directly.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::NotReadyTimeout`] when the readiness budget
    /// is spent before the gate opens.
    pub async fn fetch_since(&self, start_at_seconds: u64) -> SyncResult<()> {
        self.wait_until_ready().await?;
        self.bridge.send(&OutboundCall::FetchRecords {
            categories: self.config.fetch_categories.clone(),
            start_at_seconds,
        })
    }

    /// Requests a full fetch from the beginning of time.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SyncSession::fetch_since`].
    pub async fn fetch(&self) -> SyncResult<()> {
        self.fetch_since(0).await
    }

    fn dispatch_message(&self, message: InboundMessage) -> SyncResult<()> {
        match message {
            InboundMessage::GotInitData => self.push_init_data(),
            InboundMessage::SaveInitData { seed, device_id } => {
                self.save_init_data(seed, device_id)
            }
            InboundMessage::GetExistingObjects { records } => self.get_existing_objects(&records),
            InboundMessage::ResolvedSyncRecords { records } => {
                debug!(
                    count = records.len(),
                    "resolved-sync-records acknowledged; no local handling yet"
                );
                Ok(())
            }
            InboundMessage::ReadinessAck(flag) => {
                self.gate.acknowledge(flag);
                match flag {
                    ReadyFlag::DeleteUser
                    | ReadyFlag::DeleteSiteSettings
                    | ReadyFlag::DeleteCategory => {
                        debug!(flag = flag.as_message(), "deletion handling not implemented");
                    }
                    _ => {}
                }
                Ok(())
            }
            InboundMessage::SyncDebug { payload } => {
                debug!(%payload, "bridge debug");
                Ok(())
            }
            InboundMessage::GetInitData => Ok(()),
            InboundMessage::Unknown { message } => {
                warn!(message = %message, "unhandled bridge message");
                Ok(())
            }
        }
    }

    fn push_init_data(&self) -> SyncResult<()> {
        let call = OutboundCall::GotInitData {
            seed: self.seeds.seed()?,
            device_id: self.seeds.device_id()?,
            config: InitConfig {
                api_version: self.config.api_version.clone(),
                server_url: self.config.server_url.clone(),
                debug: self.config.debug,
            },
        };
        self.bridge.send(&call)
    }

    fn save_init_data(
        &self,
        seed: Option<SeedMaterial>,
        device_id: Option<DeviceId>,
    ) -> SyncResult<()> {
        let Some(seed) = seed else {
            warn!("save-init-data without seed payload");
            return Ok(());
        };

        match self.seeds.set_seed(&seed) {
            Ok(()) => debug!("stored sync seed"),
            Err(SyncError::SeedAlreadySet) => {
                warn!("ignoring replacement seed; already in a sync group");
            }
            Err(error) => return Err(error),
        }

        if let Some(device_id) = device_id {
            self.seeds.set_device_id(&device_id)?;
        }
        Ok(())
    }

    fn get_existing_objects(&self, records: &[SyncRecord]) -> SyncResult<()> {
        let device_id = self.seeds.device_id()?;
        let outcome = self.reconciler.reconcile(device_id.as_ref(), records);
        self.bridge.send(&OutboundCall::ResolveRecords {
            categories: vec![RecordCategory::Bookmarks],
            records: outcome.records,
        })
    }

    async fn on_ready(&self) {
        info!("sync session ready");
        if let Err(error) = self.fetch().await {
            warn!(error = %error, "initial fetch failed");
        }
        self.start_fetch_task();
    }

    fn start_fetch_task(&self) {
        let bridge = Arc::clone(&self.bridge);
        let categories = self.config.fetch_categories.clone();
        let interval = self.config.fetch_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately and the ready transition
            // already fetched once.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let call = OutboundCall::FetchRecords {
                    categories: categories.clone(),
                    start_at_seconds: 0,
                };
                if let Err(error) = bridge.send(&call) {
                    warn!(error = %error, "periodic fetch failed");
                }
            }
        });

        if let Some(previous) = self.fetch_task.lock().replace(task) {
            previous.abort();
        }
    }

    async fn wait_until_ready(&self) -> SyncResult<()> {
        let attempts = self.config.ready_attempts.max(1);
        for attempt in 1..=attempts {
            if self.closed.load(Ordering::SeqCst) {
                return Err(SyncError::SessionClosed);
            }
            if self.gate.is_ready() {
                return Ok(());
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.ready_retry_delay).await;
            }
        }
        Err(SyncError::NotReadyTimeout { attempts })
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        if let Some(task) = self.fetch_task.lock().take() {
            task.abort();
        }
    }
}
