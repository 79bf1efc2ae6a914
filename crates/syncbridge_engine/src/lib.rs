//! # Syncbridge Engine
//!
//! Readiness gating, seed persistence, and record reconciliation for
//! syncbridge.
//!
//! This crate provides:
//! - [`SyncSession`] - the single sequencer handling inbound bridge traffic
//! - [`ReadinessGate`] - the one-way latch that opens when all bridge
//!   callbacks are registered
//! - [`SeedStore`] - write-once-until-cleared seed and device id persistence
//! - [`ReconciliationEngine`] - dedup-by-stable-id merge of remote record
//!   batches into local storage
//!
//! ## Architecture
//!
//! The engine sits between two collaborators it does not own: the local
//! record store (a [`LocalStore`]) and the remote bridge (a [`BridgeSink`]
//! for outbound calls, raw envelope text inbound). Inbound messages are
//! processed to completion one at a time; outbound record traffic is
//! deferred until the readiness gate opens and fails with a timeout once
//! the retry budget is spent.
//!
//! ## Key Invariants
//!
//! - The readiness latch opens at most once per session and never closes
//! - A stored seed is never overwritten; callers must clear it first
//! - At most one local entity exists per stable record id
//! - Malformed inbound messages are logged and dropped, never fatal

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod config;
mod error;
mod local_store;
mod readiness;
mod reconcile;
mod seed_store;
mod session;
mod state_store;

pub use bridge::{BridgeSink, MockBridge};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use local_store::{LocalBookmark, LocalStore, MemoryLocalStore, NewBookmark};
pub use readiness::{ReadinessGate, ReadinessVector};
pub use reconcile::{ReconcileOutcome, ReconciliationEngine, RecordFailure};
pub use seed_store::SeedStore;
pub use session::SyncSession;
pub use state_store::{FileStateStore, MemoryStateStore, StateStore, DEVICE_ID_KEY, SEED_KEY};
