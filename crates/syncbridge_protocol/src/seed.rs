//! Seed material and device identity wire forms.

use crate::error::{ProtocolError, ProtocolResult};
use serde_json::Value;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of sync seed material in bytes.
pub const SEED_SIZE: usize = 32;

/// Key material identifying a sync group.
///
/// The bytes are zeroized when dropped. Exactly one seed may be active per
/// installation; the engine refuses to overwrite a stored seed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SeedMaterial {
    bytes: [u8; SEED_SIZE],
}

impl SeedMaterial {
    /// Creates seed material from raw bytes.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::InvalidSeedLength`] unless `bytes` is
    /// exactly [`SEED_SIZE`] long.
    pub fn from_bytes(bytes: &[u8]) -> ProtocolResult<Self> {
        if bytes.len() != SEED_SIZE {
            return Err(ProtocolError::InvalidSeedLength {
                len: bytes.len(),
                expected: SEED_SIZE,
            });
        }
        let mut seed = [0u8; SEED_SIZE];
        seed.copy_from_slice(bytes);
        Ok(Self { bytes: seed })
    }

    /// Returns the raw seed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.bytes
    }

    /// Parses the bridge's index-to-byte map form.
    ///
    /// The bridge delivers the seed as a JSON object keyed by decimal
    /// indices (`{"0": 12, "1": 255, ...}`). Missing indices default to 0
    /// and out-of-range or non-numeric entries are ignored.
    #[must_use]
    pub fn from_index_map(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut bytes = [0u8; SEED_SIZE];
        for (key, entry) in map {
            let Ok(index) = key.parse::<usize>() else {
                continue;
            };
            if index >= SEED_SIZE {
                continue;
            }
            if let Some(byte) = entry.as_u64().and_then(|n| u8::try_from(n).ok()) {
                bytes[index] = byte;
            }
        }
        Some(Self { bytes })
    }

    /// Renders the seed in its persisted textual array form.
    #[must_use]
    pub fn to_array_string(&self) -> String {
        render_array(&self.bytes)
    }

    /// Parses the persisted textual array form.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or a wrong-length array.
    pub fn from_array_string(text: &str) -> ProtocolResult<Self> {
        let bytes: Vec<u8> = serde_json::from_str(text)?;
        Self::from_bytes(&bytes)
    }

    /// Renders the seed as a JSON number array for the bridge.
    #[must_use]
    pub fn to_json_array(&self) -> Value {
        Value::Array(self.bytes.iter().map(|b| Value::from(*b)).collect())
    }
}

impl From<[u8; SEED_SIZE]> for SeedMaterial {
    fn from(bytes: [u8; SEED_SIZE]) -> Self {
        Self { bytes }
    }
}

impl std::fmt::Debug for SeedMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedMaterial")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Token identifying this device within its sync group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(Vec<u8>);

impl DeviceId {
    /// Creates a device id from raw bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the raw token bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parses the bridge's index-to-byte map form.
    ///
    /// Entries are placed by decimal index; the result is sized to the
    /// highest index seen. Returns `None` for a non-object or empty map.
    #[must_use]
    pub fn from_index_map(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut entries: Vec<(usize, u8)> = Vec::with_capacity(map.len());
        for (key, entry) in map {
            let Ok(index) = key.parse::<usize>() else {
                continue;
            };
            if let Some(byte) = entry.as_u64().and_then(|n| u8::try_from(n).ok()) {
                entries.push((index, byte));
            }
        }
        let max_index = entries.iter().map(|(index, _)| *index).max()?;
        let mut bytes = vec![0u8; max_index + 1];
        for (index, byte) in entries {
            bytes[index] = byte;
        }
        Some(Self(bytes))
    }

    /// Renders the id in its persisted textual array form.
    #[must_use]
    pub fn to_array_string(&self) -> String {
        render_array(&self.0)
    }

    /// Parses the persisted textual array form.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON.
    pub fn from_array_string(text: &str) -> ProtocolResult<Self> {
        let bytes: Vec<u8> = serde_json::from_str(text)?;
        Ok(Self(bytes))
    }

    /// Renders the id as a JSON number array for the bridge.
    #[must_use]
    pub fn to_json_array(&self) -> Value {
        Value::Array(self.0.iter().map(|b| Value::from(*b)).collect())
    }
}

fn render_array(bytes: &[u8]) -> String {
    let rendered: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seed_length_is_enforced() {
        assert!(SeedMaterial::from_bytes(&[0u8; 32]).is_ok());
        assert!(matches!(
            SeedMaterial::from_bytes(&[0u8; 31]),
            Err(ProtocolError::InvalidSeedLength { len: 31, .. })
        ));
    }

    #[test]
    fn seed_index_map_defaults_missing_entries() {
        let map = json!({"0": 7, "2": 9, "31": 255, "40": 1, "x": 3});
        let seed = SeedMaterial::from_index_map(&map).unwrap();
        assert_eq!(seed.as_bytes()[0], 7);
        assert_eq!(seed.as_bytes()[1], 0);
        assert_eq!(seed.as_bytes()[2], 9);
        assert_eq!(seed.as_bytes()[31], 255);
    }

    #[test]
    fn seed_index_map_rejects_non_objects() {
        assert!(SeedMaterial::from_index_map(&json!([1, 2, 3])).is_none());
        assert!(SeedMaterial::from_index_map(&Value::Null).is_none());
    }

    #[test]
    fn seed_array_string_round_trips() {
        let mut bytes = [0u8; SEED_SIZE];
        bytes[0] = 0;
        bytes[1] = 238;
        bytes[31] = 159;
        let seed = SeedMaterial::from(bytes);
        let text = seed.to_array_string();
        assert!(text.starts_with("[0, 238,"));
        let restored = SeedMaterial::from_array_string(&text).unwrap();
        assert_eq!(restored, seed);
    }

    #[test]
    fn seed_debug_is_redacted() {
        let seed = SeedMaterial::from([3u8; SEED_SIZE]);
        let rendered = format!("{seed:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains('3'));
    }

    #[test]
    fn device_id_from_single_entry_map() {
        let id = DeviceId::from_index_map(&json!({"0": 4})).unwrap();
        assert_eq!(id.as_bytes(), &[4]);
        assert_eq!(id.to_array_string(), "[4]");
    }

    #[test]
    fn device_id_empty_map_is_none() {
        assert!(DeviceId::from_index_map(&json!({})).is_none());
    }

    #[test]
    fn device_id_array_string_round_trips() {
        let id = DeviceId::new(vec![1, 2]);
        let restored = DeviceId::from_array_string(&id.to_array_string()).unwrap();
        assert_eq!(restored, id);
    }
}
