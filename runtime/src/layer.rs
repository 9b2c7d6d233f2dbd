//! Write-through persistence layer for an active session.
//!
//! The layer owns the working snapshot. Every mutation stamps the snapshot,
//! marks it dirty, and mirrors it to the device cache so an interrupted
//! session can restore from local state. Dirty snapshots are pushed to the
//! remote store by `flush`, either directly or from the autosave task.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::time::MissedTickBehavior;

use prefsync_engine::{KeySpace, PreferenceSnapshot, UserId};

use crate::error::Result;
use crate::store::{CacheStore, RemoteStore, StoreError};

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend(format!("poisoned lock: {context}"))
}

#[derive(Debug)]
struct LayerState {
    snapshot: PreferenceSnapshot,
    dirty: bool,
}

/// Session-scoped preference state with write-through caching.
pub struct PersistenceLayer {
    user_id: UserId,
    server_key: String,
    cache_key: String,
    cache: Arc<dyn CacheStore>,
    state: RwLock<LayerState>,
}

impl PersistenceLayer {
    /// Create a layer seeded with the reconciled snapshot.
    ///
    /// The seed is considered clean: nothing is pushed to the remote store
    /// until a mutation happens.
    pub fn new(
        user_id: impl Into<UserId>,
        keys: &KeySpace,
        preloaded: PreferenceSnapshot,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        let user_id = user_id.into();

        Self {
            server_key: keys.server_key(),
            cache_key: keys.cache_key(&user_id),
            user_id,
            cache,
            state: RwLock::new(LayerState {
                snapshot: preloaded,
                dirty: false,
            }),
        }
    }

    /// Get a preference value by key.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let state = self.state.read().map_err(|_| lock_err("layer.get"))?;
        Ok(state.snapshot.get(key).cloned())
    }

    /// Set a preference value, stamping the snapshot and mirroring it to
    /// the cache.
    ///
    /// The cache write happens under the snapshot lock, so payloads reach
    /// the cache in mutation order. The in-memory change survives a failed
    /// cache write; the next flush still pushes it to the remote store.
    pub fn set(&self, key: impl Into<String>, value: Value) -> Result<()> {
        let key = key.into();

        {
            let mut state = self.state.write().map_err(|_| lock_err("layer.set"))?;
            state.snapshot.insert(key.clone(), value)?;
            state.snapshot.touch(Utc::now());
            state.dirty = true;
            let payload = state.snapshot.to_json()?;
            self.cache.write(&self.cache_key, &payload)?;
        }

        tracing::debug!(key = %key, "Preference updated");

        Ok(())
    }

    /// Remove a preference value.
    ///
    /// Removing an absent key changes nothing: no stamp, no cache write.
    pub fn remove(&self, key: &str) -> Result<Option<Value>> {
        let removed = {
            let mut state = self.state.write().map_err(|_| lock_err("layer.remove"))?;
            let removed = state.snapshot.remove(key)?;
            if removed.is_none() {
                return Ok(None);
            }
            state.snapshot.touch(Utc::now());
            state.dirty = true;
            let payload = state.snapshot.to_json()?;
            self.cache.write(&self.cache_key, &payload)?;
            removed
        };

        tracing::debug!(key = %key, "Preference removed");

        Ok(removed)
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> Result<PreferenceSnapshot> {
        let state = self.state.read().map_err(|_| lock_err("layer.snapshot"))?;
        Ok(state.snapshot.clone())
    }

    /// Whether the snapshot has unsaved changes.
    pub fn is_dirty(&self) -> Result<bool> {
        let state = self.state.read().map_err(|_| lock_err("layer.dirty"))?;
        Ok(state.dirty)
    }

    /// Push the snapshot to the remote store if it is dirty.
    ///
    /// Returns `true` when a save happened. The dirty flag is only cleared
    /// when the saved snapshot is still current; a set that raced the save
    /// keeps the layer dirty for the next flush.
    pub fn flush(&self, remote: &dyn RemoteStore) -> Result<bool> {
        let (snapshot, document) = {
            let state = self.state.read().map_err(|_| lock_err("layer.flush"))?;
            if !state.dirty {
                return Ok(false);
            }
            (state.snapshot.clone(), state.snapshot.to_value()?)
        };

        remote.save(&self.user_id, &self.server_key, &document)?;

        let mut state = self.state.write().map_err(|_| lock_err("layer.flush"))?;
        if state.snapshot == snapshot {
            state.dirty = false;
        }

        Ok(true)
    }
}

impl std::fmt::Debug for PersistenceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceLayer")
            .field("user_id", &self.user_id)
            .field("server_key", &self.server_key)
            .field("cache_key", &self.cache_key)
            .finish_non_exhaustive()
    }
}

/// Spawn the periodic autosave task for a layer.
///
/// The first save happens one full interval after spawn; a zero interval
/// is clamped to one millisecond. Flush errors are logged and the task
/// keeps running.
pub fn spawn_autosave(
    layer: Arc<PersistenceLayer>,
    remote: Arc<dyn RemoteStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    // tokio::time::interval panics on a zero period.
    let period = interval.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; consume that tick so the first
        // save waits a full interval.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match layer.flush(remote.as_ref()) {
                Ok(true) => {
                    tracing::debug!(user_id = %layer.user_id, "Autosaved preferences");
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(user_id = %layer.user_id, error = %err, "Autosave failed");
                }
            }
        }
    })
}
