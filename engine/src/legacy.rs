//! Legacy-format conversion.
//!
//! Before preference documents were stamped and stored per user, an older
//! cache layout wrapped each scope's entries in a `preferences` envelope.
//! Conversion is the last resort of reconciliation: it is consulted only
//! when neither the server nor the local cache holds a document.

use crate::{PreferenceSnapshot, MODIFIED_KEY};
use serde_json::Value;
use std::collections::BTreeMap;

/// Strategy for recovering preferences from a legacy store.
///
/// Implementations capture whatever state they need at construction; from
/// the engine's point of view conversion is a pure lookup. Absent or
/// unusable legacy data is `None`, never an error.
pub trait LegacyConverter: Send + Sync {
    /// Recover the legacy preferences for a user, if any exist.
    fn convert(&self, user_id: &str) -> Option<PreferenceSnapshot>;
}

/// The null strategy: no legacy data exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLegacyData;

impl LegacyConverter for NoLegacyData {
    fn convert(&self, _user_id: &str) -> Option<PreferenceSnapshot> {
        None
    }
}

/// Lift a legacy blob into a snapshot.
///
/// The legacy layout is `{"<scope>": {"preferences": {...}}}`; each scope's
/// envelope becomes one preference entry keyed by the scope name. Scopes
/// without an object-valued envelope are skipped. A blob that is not an
/// object, or yields no scopes, converts to `None`. Converted snapshots
/// carry no timestamp; legacy stores predate stamping.
pub fn convert_blob(blob: &Value) -> Option<PreferenceSnapshot> {
    let scopes = blob.as_object()?;

    let mut values = BTreeMap::new();
    for (scope, entry) in scopes {
        // The reserved timestamp key is never a scope.
        if scope == MODIFIED_KEY {
            continue;
        }
        match entry.get("preferences") {
            Some(preferences) if preferences.is_object() => {
                values.insert(scope.clone(), preferences.clone());
            }
            _ => {}
        }
    }

    if values.is_empty() {
        return None;
    }
    Some(PreferenceSnapshot::from_values(values))
}
