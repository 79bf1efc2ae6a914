//! Outbound calls pushed to the remote bridge.

use crate::error::ProtocolResult;
use crate::record::{RecordCategory, SyncRecord};
use crate::seed::{DeviceId, SeedMaterial};
use serde::Serialize;
use serde_json::{json, Value};

/// Static configuration reported to the bridge with `got-init-data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitConfig {
    /// Protocol api version string.
    pub api_version: String,
    /// Sync server URL.
    pub server_url: String,
    /// Whether the bridge should run in debug mode.
    pub debug: bool,
}

/// A remote record paired with its local representation after
/// reconciliation.
///
/// The wire form is a two-element array `[remote, local]`, one per
/// reconciled record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    /// The record as fetched from the sync service.
    pub remote: SyncRecord,
    /// The local entity's sync-facing form after merge.
    pub local: SyncRecord,
}

/// A call pushed to the remote bridge.
///
/// Each variant maps to one named bridge callback; [`OutboundCall::name`]
/// gives the callback name and [`OutboundCall::args`] its JSON argument
/// list.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundCall {
    /// Replies to `got-init-data` with stored identity and configuration.
    GotInitData {
        /// The active seed, if one is stored.
        seed: Option<SeedMaterial>,
        /// The persisted device id, if assigned.
        device_id: Option<DeviceId>,
        /// Bridge configuration.
        config: InitConfig,
    },
    /// Uploads a batch of local records.
    SendRecords {
        /// Category the records belong to.
        category: RecordCategory,
        /// The records to upload.
        records: Vec<SyncRecord>,
    },
    /// Asks the bridge to fetch records changed since a timestamp.
    FetchRecords {
        /// Categories to fetch.
        categories: Vec<RecordCategory>,
        /// Fetch horizon in seconds since the epoch.
        start_at_seconds: u64,
    },
    /// Returns reconciled record pairs for a resolve round.
    ResolveRecords {
        /// Categories the batch covers.
        categories: Vec<RecordCategory>,
        /// The reconciled pairs.
        records: Vec<ResolvedRecord>,
    },
}

impl OutboundCall {
    /// Returns the bridge callback name for this call.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            OutboundCall::GotInitData { .. } => "got-init-data",
            OutboundCall::SendRecords { .. } => "send-sync-records",
            OutboundCall::FetchRecords { .. } => "fetch-sync-records",
            OutboundCall::ResolveRecords { .. } => "resolve-sync-records",
        }
    }

    /// Serializes the JSON argument list for this call.
    ///
    /// # Errors
    ///
    /// Fails only if record serialization fails, which would indicate a
    /// bug in the record types.
    pub fn args(&self) -> ProtocolResult<Value> {
        let args = match self {
            OutboundCall::GotInitData {
                seed,
                device_id,
                config,
            } => {
                let seed = seed
                    .as_ref()
                    .map_or(Value::Null, SeedMaterial::to_json_array);
                let device_id = device_id
                    .as_ref()
                    .map_or(Value::Null, DeviceId::to_json_array);
                json!([seed, device_id, serde_json::to_value(config)?])
            }
            OutboundCall::SendRecords { category, records } => {
                json!([category.as_wire_str(), serde_json::to_value(records)?])
            }
            OutboundCall::FetchRecords {
                categories,
                start_at_seconds,
            } => {
                json!([category_names(categories), start_at_seconds])
            }
            OutboundCall::ResolveRecords {
                categories,
                records,
            } => {
                let pairs: ProtocolResult<Vec<Value>> = records
                    .iter()
                    .map(|pair| {
                        Ok(json!([
                            serde_json::to_value(&pair.remote)?,
                            serde_json::to_value(&pair.local)?
                        ]))
                    })
                    .collect();
                json!([category_names(categories), Value::Array(pairs?)])
            }
        };
        Ok(args)
    }
}

fn category_names(categories: &[RecordCategory]) -> Value {
    Value::Array(
        categories
            .iter()
            .map(|category| Value::from(category.as_wire_str()))
            .collect(),
    )
}
