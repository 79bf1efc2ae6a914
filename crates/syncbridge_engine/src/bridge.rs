//! Outbound edge to the remote bridge.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use syncbridge_protocol::OutboundCall;

/// Delivery edge for calls pushed to the remote bridge.
///
/// The embedding application implements this against whatever hosts the
/// bridge. Delivery is fire-and-forget from the engine's viewpoint.
pub trait BridgeSink: Send + Sync {
    /// Delivers one outbound call.
    fn send(&self, call: &OutboundCall) -> SyncResult<()>;
}

/// A bridge sink that records calls, for tests.
#[derive(Debug, Default)]
pub struct MockBridge {
    calls: Mutex<Vec<OutboundCall>>,
    fail: AtomicBool,
}

impl MockBridge {
    /// Creates a mock with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every call delivered so far.
    #[must_use]
    pub fn calls(&self) -> Vec<OutboundCall> {
        self.calls.lock().clone()
    }

    /// Counts delivered calls with the given callback name.
    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.name() == name)
            .count()
    }

    /// Makes subsequent sends fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl BridgeSink for MockBridge {
    fn send(&self, call: &OutboundCall) -> SyncResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Bridge("mock bridge set to fail".into()));
        }
        self.calls.lock().push(call.clone());
        Ok(())
    }
}
