//! # Syncbridge Protocol
//!
//! Record types and bridge envelope codecs for syncbridge.
//!
//! This crate provides:
//! - [`SyncRecord`] and its bookmark payload types
//! - [`BridgeEnvelope`] parsing for inbound bridge messages
//! - [`InboundMessage`] dispatch tags for every known discriminator
//! - [`OutboundCall`] serialization for calls pushed to the bridge
//! - [`SeedMaterial`] and [`DeviceId`] wire forms
//!
//! The remote bridge speaks JSON: every inbound message is an envelope of
//! the form `{"message": <discriminator>, "arg1": ..., "arg2": ...}`, and
//! every outbound call is a named callback with a JSON argument list.
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod error;
mod outbound;
mod record;
mod seed;

pub use envelope::{BridgeEnvelope, InboundMessage, ReadyFlag};
pub use error::{ProtocolError, ProtocolResult};
pub use outbound::{InitConfig, OutboundCall, ResolvedRecord};
pub use record::{BookmarkRecord, ObjectKind, RecordCategory, SiteRecord, SyncAction, SyncRecord};
pub use seed::{DeviceId, SeedMaterial, SEED_SIZE};
