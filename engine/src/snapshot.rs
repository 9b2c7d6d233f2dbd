//! Snapshot types for persisted preference state.
//!
//! A snapshot is one user's complete preference document as it travels
//! between the server store, the local cache, and the session. It is
//! designed for deterministic serialization and for surviving hostile
//! metadata: a mangled timestamp never invalidates the document.

use crate::{error::Result, timestamp, EpochMillis, Error, PreferenceKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved wire key carrying the last-writer timestamp.
pub const MODIFIED_KEY: &str = "__modified";

/// A point-in-time copy of a user's preferences.
///
/// On the wire this is a single flat JSON object: every entry is a
/// preference key, plus the reserved `__modified` entry when the snapshot
/// has been stamped. Uses BTreeMap instead of HashMap for deterministic
/// serialization order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreferenceSnapshot {
    /// Raw last-writer timestamp, kept verbatim. Interpretation is lazy
    /// and fail-soft; see [`modified_epoch_ms`](Self::modified_epoch_ms).
    #[serde(
        rename = "__modified",
        default,
        deserialize_with = "modified_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    modified_at: Option<String>,
    /// Preference entries, opaque to the engine.
    #[serde(flatten)]
    values: BTreeMap<PreferenceKey, Value>,
}

/// A `__modified` holding anything but a string reads as absent. The
/// decision procedure must stay total even against type-mangled metadata.
fn modified_lenient<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => Some(raw),
        _ => None,
    })
}

impl PreferenceSnapshot {
    /// Create a new empty snapshot with no timestamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing value map.
    ///
    /// A stray `__modified` entry in the map is lifted into the timestamp
    /// slot (when it is a string) rather than kept as a preference.
    pub fn from_values(mut values: BTreeMap<PreferenceKey, Value>) -> Self {
        let modified_at = match values.remove(MODIFIED_KEY) {
            Some(Value::String(raw)) => Some(raw),
            _ => None,
        };
        Self {
            modified_at,
            values,
        }
    }

    /// Get a preference value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a preference value.
    ///
    /// The reserved `__modified` key is rejected; the timestamp moves only
    /// through [`touch`](Self::touch).
    pub fn insert(&mut self, key: impl Into<PreferenceKey>, value: Value) -> Result<()> {
        let key = key.into();
        if key == MODIFIED_KEY {
            return Err(Error::ReservedKey(key));
        }
        self.values.insert(key, value);
        Ok(())
    }

    /// Remove a preference value, returning the previous one.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        if key == MODIFIED_KEY {
            return Err(Error::ReservedKey(key.to_string()));
        }
        Ok(self.values.remove(key))
    }

    /// All preference entries.
    pub fn values(&self) -> &BTreeMap<PreferenceKey, Value> {
        &self.values
    }

    /// Number of preference entries (the timestamp does not count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the snapshot holds no preference entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw timestamp string, if any.
    pub fn modified_at(&self) -> Option<&str> {
        self.modified_at.as_deref()
    }

    /// Stamp the snapshot as modified at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = Some(timestamp::format_rfc3339(now));
    }

    /// The timestamp read as epoch milliseconds, fail-soft.
    ///
    /// Absent or unparseable timestamps read as `0`, so they lose to any
    /// intact timestamp during reconciliation.
    pub fn modified_epoch_ms(&self) -> EpochMillis {
        timestamp::parse_epoch_ms(self.modified_at.as_deref())
    }

    /// Serialize to JSON with deterministic ordering.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to a JSON value (for stores that persist structured data).
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize from JSON text. Anything but an object is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }
}
