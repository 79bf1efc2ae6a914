//! Inbound bridge envelope parsing and message dispatch tags.

use crate::error::{ProtocolError, ProtocolResult};
use crate::record::SyncRecord;
use crate::seed::{DeviceId, SeedMaterial};
use serde_json::Value;

/// The raw JSON envelope every inbound bridge message arrives in.
///
/// The bridge sends `{"message": <discriminator>, "arg1": ..., "arg2": ...}`
/// with discriminator-specific argument payloads. Absent arguments parse as
/// JSON null.
#[derive(Debug, Clone)]
pub struct BridgeEnvelope {
    /// Discriminator string selecting the handler.
    pub message: String,
    /// First argument payload.
    pub arg1: Value,
    /// Second argument payload.
    pub arg2: Value,
}

impl BridgeEnvelope {
    /// Parses an envelope from raw message text.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::Json`] on invalid JSON and
    /// [`ProtocolError::MalformedMessage`] when the envelope is not an
    /// object or lacks a string `message` discriminator.
    pub fn parse(raw: &str) -> ProtocolResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Builds an envelope from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`BridgeEnvelope::parse`].
    pub fn from_value(value: Value) -> ProtocolResult<Self> {
        let Value::Object(mut map) = value else {
            return Err(ProtocolError::malformed("envelope is not an object"));
        };
        let message = match map.remove("message") {
            Some(Value::String(message)) => message,
            Some(_) => return Err(ProtocolError::malformed("message discriminator not a string")),
            None => return Err(ProtocolError::malformed("missing message discriminator")),
        };
        let arg1 = map.remove("arg1").unwrap_or(Value::Null);
        let arg2 = map.remove("arg2").unwrap_or(Value::Null);
        Ok(Self {
            message,
            arg1,
            arg2,
        })
    }
}

/// Subsystem-ready acknowledgements sent by the bridge.
///
/// Each flag corresponds to one bridge callback becoming available; the
/// readiness gate opens once every flag has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyFlag {
    /// `sync-ready` received.
    Sync,
    /// `fetch-sync-records` callback registered.
    Fetch,
    /// `send-sync-records` callback registered.
    SendRecords,
    /// `resolve-sync-records` callback registered.
    ResolveRecords,
    /// `delete-sync-user` callback registered.
    DeleteUser,
    /// `delete-sync-site-settings` callback registered.
    DeleteSiteSettings,
    /// `delete-sync-category` callback registered.
    DeleteCategory,
}

impl ReadyFlag {
    /// Every flag, in acknowledgement order.
    pub const ALL: [ReadyFlag; 7] = [
        ReadyFlag::Sync,
        ReadyFlag::Fetch,
        ReadyFlag::SendRecords,
        ReadyFlag::ResolveRecords,
        ReadyFlag::DeleteUser,
        ReadyFlag::DeleteSiteSettings,
        ReadyFlag::DeleteCategory,
    ];

    /// Maps an inbound discriminator to its readiness flag.
    #[must_use]
    pub fn from_message(message: &str) -> Option<Self> {
        match message {
            "sync-ready" => Some(ReadyFlag::Sync),
            "fetch-sync-records" => Some(ReadyFlag::Fetch),
            "send-sync-records" => Some(ReadyFlag::SendRecords),
            "resolve-sync-records" => Some(ReadyFlag::ResolveRecords),
            "delete-sync-user" => Some(ReadyFlag::DeleteUser),
            "delete-sync-site-settings" => Some(ReadyFlag::DeleteSiteSettings),
            "delete-sync-category" => Some(ReadyFlag::DeleteCategory),
            _ => None,
        }
    }

    /// Returns the discriminator that acknowledges this flag.
    #[must_use]
    pub fn as_message(&self) -> &'static str {
        match self {
            ReadyFlag::Sync => "sync-ready",
            ReadyFlag::Fetch => "fetch-sync-records",
            ReadyFlag::SendRecords => "send-sync-records",
            ReadyFlag::ResolveRecords => "resolve-sync-records",
            ReadyFlag::DeleteUser => "delete-sync-user",
            ReadyFlag::DeleteSiteSettings => "delete-sync-site-settings",
            ReadyFlag::DeleteCategory => "delete-sync-category",
        }
    }
}

/// A typed inbound bridge message, dispatched by discriminator.
#[derive(Debug, Clone)]
pub enum InboundMessage {
    /// Bridge requests the stored identity and configuration.
    GotInitData,
    /// Bridge delivers freshly assigned seed and device id to persist.
    SaveInitData {
        /// Seed parsed from the `arg1` index map, if present.
        seed: Option<SeedMaterial>,
        /// Device id parsed from the `arg2` index map, if present.
        device_id: Option<DeviceId>,
    },
    /// Bridge asks which fetched records already exist locally.
    GetExistingObjects {
        /// The remote record batch from `arg2`.
        records: Vec<SyncRecord>,
    },
    /// Bridge reports the outcome of a resolve round.
    ResolvedSyncRecords {
        /// The resolved record batch from `arg2`.
        records: Vec<SyncRecord>,
    },
    /// Bridge acknowledges a callback registration.
    ReadinessAck(ReadyFlag),
    /// Bridge debug chatter.
    SyncDebug {
        /// Arbitrary debug payload.
        payload: Value,
    },
    /// Recognized discriminator with no local handling.
    GetInitData,
    /// A discriminator this version does not know.
    Unknown {
        /// The unrecognized discriminator.
        message: String,
    },
}

impl InboundMessage {
    /// Parses an inbound message from raw envelope text.
    ///
    /// # Errors
    ///
    /// Propagates envelope parse failures; an unknown discriminator is not
    /// an error and maps to [`InboundMessage::Unknown`].
    pub fn parse(raw: &str) -> ProtocolResult<Self> {
        Self::from_envelope(BridgeEnvelope::parse(raw)?)
    }

    /// Dispatches a parsed envelope to its typed message.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::MalformedMessage`] when a known
    /// discriminator carries an argument payload of the wrong shape.
    pub fn from_envelope(envelope: BridgeEnvelope) -> ProtocolResult<Self> {
        let message = match envelope.message.as_str() {
            "got-init-data" => InboundMessage::GotInitData,
            "get-init-data" => InboundMessage::GetInitData,
            "save-init-data" => InboundMessage::SaveInitData {
                seed: SeedMaterial::from_index_map(&envelope.arg1),
                device_id: DeviceId::from_index_map(&envelope.arg2),
            },
            "get-existing-objects" => InboundMessage::GetExistingObjects {
                records: parse_record_batch(envelope.arg2, "get-existing-objects")?,
            },
            "resolved-sync-records" => InboundMessage::ResolvedSyncRecords {
                records: parse_record_batch(envelope.arg2, "resolved-sync-records")?,
            },
            "sync-debug" => InboundMessage::SyncDebug {
                payload: envelope.arg1,
            },
            other => match ReadyFlag::from_message(other) {
                Some(flag) => InboundMessage::ReadinessAck(flag),
                None => InboundMessage::Unknown {
                    message: envelope.message.clone(),
                },
            },
        };
        Ok(message)
    }
}

fn parse_record_batch(value: Value, context: &str) -> ProtocolResult<Vec<SyncRecord>> {
    if value.is_null() {
        return Err(ProtocolError::malformed(format!(
            "{context} without a record batch"
        )));
    }
    serde_json::from_value(value).map_err(|e| {
        ProtocolError::malformed(format!("{context} record batch did not parse: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_requires_discriminator() {
        assert!(matches!(
            BridgeEnvelope::parse(r#"{"arg1": 1}"#),
            Err(ProtocolError::MalformedMessage { .. })
        ));
        assert!(matches!(
            BridgeEnvelope::parse("[1, 2]"),
            Err(ProtocolError::MalformedMessage { .. })
        ));
        assert!(matches!(
            BridgeEnvelope::parse("not json"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn envelope_defaults_missing_args_to_null() {
        let envelope = BridgeEnvelope::parse(r#"{"message": "sync-ready"}"#).unwrap();
        assert_eq!(envelope.message, "sync-ready");
        assert!(envelope.arg1.is_null());
        assert!(envelope.arg2.is_null());
    }

    #[test]
    fn every_readiness_ack_dispatches() {
        for flag in ReadyFlag::ALL {
            let raw = format!(r#"{{"message": "{}"}}"#, flag.as_message());
            let message = InboundMessage::parse(&raw).unwrap();
            match message {
                InboundMessage::ReadinessAck(parsed) => assert_eq!(parsed, flag),
                other => panic!("expected readiness ack, got {other:?}"),
            }
        }
    }

    #[test]
    fn save_init_data_parses_seed_and_device() {
        let raw = json!({
            "message": "save-init-data",
            "arg1": {"0": 1, "31": 2},
            "arg2": {"0": 5}
        })
        .to_string();

        let message = InboundMessage::parse(&raw).unwrap();
        match message {
            InboundMessage::SaveInitData { seed, device_id } => {
                let seed = seed.unwrap();
                assert_eq!(seed.as_bytes()[0], 1);
                assert_eq!(seed.as_bytes()[31], 2);
                assert_eq!(device_id.unwrap().as_bytes(), &[5]);
            }
            other => panic!("expected save-init-data, got {other:?}"),
        }
    }

    #[test]
    fn save_init_data_without_seed_yields_none() {
        let message =
            InboundMessage::parse(r#"{"message": "save-init-data", "arg2": {"0": 5}}"#).unwrap();
        match message {
            InboundMessage::SaveInitData { seed, .. } => assert!(seed.is_none()),
            other => panic!("expected save-init-data, got {other:?}"),
        }
    }

    #[test]
    fn get_existing_objects_parses_batch() {
        let raw = json!({
            "message": "get-existing-objects",
            "arg2": [
                {"objectId": "a", "action": 0, "objectData": "bookmark", "bookmark": {}},
                {"action": 1}
            ]
        })
        .to_string();

        let message = InboundMessage::parse(&raw).unwrap();
        match message {
            InboundMessage::GetExistingObjects { records } => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].object_id.as_deref(), Some("a"));
                assert!(records[1].object_id.is_none());
            }
            other => panic!("expected get-existing-objects, got {other:?}"),
        }
    }

    #[test]
    fn get_existing_objects_without_batch_is_malformed() {
        let result = InboundMessage::parse(r#"{"message": "get-existing-objects"}"#);
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedMessage { .. })
        ));
    }

    #[test]
    fn unknown_discriminator_is_not_an_error() {
        let message = InboundMessage::parse(r#"{"message": "sync-shiny-new"}"#).unwrap();
        match message {
            InboundMessage::Unknown { message } => assert_eq!(message, "sync-shiny-new"),
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn sync_debug_carries_payload() {
        let message =
            InboundMessage::parse(r#"{"message": "sync-debug", "arg1": {"note": "hi"}}"#).unwrap();
        match message {
            InboundMessage::SyncDebug { payload } => assert_eq!(payload["note"], "hi"),
            other => panic!("expected sync-debug, got {other:?}"),
        }
    }
}
