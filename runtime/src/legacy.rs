//! Legacy preference recovery from the device cache.

use std::sync::Arc;

use prefsync_engine::{convert_blob, KeySpace, LegacyConverter, PreferenceSnapshot};

use crate::store::CacheStore;

/// Converts preferences persisted by earlier releases.
///
/// Older releases cached an unstamped blob of per-scope envelopes under a
/// separate cache key. When neither the server nor the current cache has a
/// snapshot, this converter lifts that blob into snapshot form so upgraded
/// installs keep their settings.
pub struct CacheLegacyConverter {
    cache: Arc<dyn CacheStore>,
    keys: KeySpace,
}

impl CacheLegacyConverter {
    pub fn new(cache: Arc<dyn CacheStore>, keys: KeySpace) -> Self {
        Self { cache, keys }
    }
}

impl LegacyConverter for CacheLegacyConverter {
    fn convert(&self, user_id: &str) -> Option<PreferenceSnapshot> {
        let key = self.keys.legacy_cache_key(user_id);

        let payload = match self.cache.read(&key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Legacy cache read failed");
                return None;
            }
        };

        let blob = match serde_json::from_str(&payload) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Legacy cache payload is not valid JSON");
                return None;
            }
        };

        convert_blob(&blob)
    }
}
