//! Readiness latch gating sync traffic.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use syncbridge_protocol::ReadyFlag;

/// The named subsystem-ready flags for one sync session.
///
/// Each flag transitions false to true at most once, when the bridge
/// acknowledges the matching callback registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessVector {
    /// `sync-ready` received.
    pub sync_ready: bool,
    /// Fetch callback registered.
    pub fetch_ready: bool,
    /// Send-records callback registered.
    pub send_records_ready: bool,
    /// Resolve-records callback registered.
    pub resolve_records_ready: bool,
    /// Delete-user callback registered.
    pub delete_user_ready: bool,
    /// Delete-site-settings callback registered.
    pub delete_site_settings_ready: bool,
    /// Delete-category callback registered.
    pub delete_category_ready: bool,
}

impl ReadinessVector {
    /// Returns true once every subsystem has reported ready.
    #[must_use]
    pub fn all_true(&self) -> bool {
        self.sync_ready
            && self.fetch_ready
            && self.send_records_ready
            && self.resolve_records_ready
            && self.delete_user_ready
            && self.delete_site_settings_ready
            && self.delete_category_ready
    }

    fn set(&mut self, flag: ReadyFlag) {
        match flag {
            ReadyFlag::Sync => self.sync_ready = true,
            ReadyFlag::Fetch => self.fetch_ready = true,
            ReadyFlag::SendRecords => self.send_records_ready = true,
            ReadyFlag::ResolveRecords => self.resolve_records_ready = true,
            ReadyFlag::DeleteUser => self.delete_user_ready = true,
            ReadyFlag::DeleteSiteSettings => self.delete_site_settings_ready = true,
            ReadyFlag::DeleteCategory => self.delete_category_ready = true,
        }
    }
}

/// One-way latch that opens when all subsystems are ready.
///
/// Flag writes are serialized behind a lock so the all-true check never
/// races, and the latch itself is session-local state: it resets only by
/// building a new gate for a new session.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    flags: Mutex<ReadinessVector>,
    latched: AtomicBool,
}

impl ReadinessGate {
    /// Creates a gate with no flags set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a subsystem acknowledgement. Repeated acks are no-ops.
    pub fn acknowledge(&self, flag: ReadyFlag) {
        self.flags.lock().set(flag);
    }

    /// Re-evaluates the latch.
    ///
    /// Returns true only for the single call that observes the
    /// NotReady to Ready transition; every later call returns false.
    pub fn evaluate(&self) -> bool {
        if self.latched.load(Ordering::SeqCst) {
            return false;
        }
        let flags = self.flags.lock();
        flags.all_true() && !self.latched.swap(true, Ordering::SeqCst)
    }

    /// Returns whether the latch has opened.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.latched.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of the flag vector.
    #[must_use]
    pub fn snapshot(&self) -> ReadinessVector {
        *self.flags.lock()
    }
}
