//! Session bootstrap.
//!
//! Runs once at startup: load the server and cached copies of the user's
//! preferences, reconcile them, and wrap the winner in a persistence layer
//! ready for reads and writes.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use prefsync_engine::{
    reconcile, KeySpace, LegacyConverter, PreferenceSnapshot, Reconciled, ReconcileInput,
    SnapshotSource, UserId,
};

use crate::config::BootstrapConfig;
use crate::error::Result;
use crate::layer::{spawn_autosave, PersistenceLayer};
use crate::store::{CacheStore, RemoteStore};

/// An active preference session.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: Uuid,
    /// User the session belongs to
    pub user_id: UserId,
    /// Where the restored snapshot came from, if anywhere
    pub source: Option<SnapshotSource>,
    layer: Arc<PersistenceLayer>,
    autosave_interval: Duration,
}

impl Session {
    /// The persistence layer backing this session.
    pub fn layer(&self) -> &Arc<PersistenceLayer> {
        &self.layer
    }

    /// Spawn the autosave task with the configured interval.
    pub fn spawn_autosave(&self, remote: Arc<dyn RemoteStore>) -> tokio::task::JoinHandle<()> {
        spawn_autosave(Arc::clone(&self.layer), remote, self.autosave_interval)
    }
}

fn load_server_snapshot(
    remote: &dyn RemoteStore,
    user_id: &str,
    keys: &KeySpace,
) -> Result<Option<PreferenceSnapshot>> {
    let key = keys.server_key();
    let Some(document) = remote.load(user_id, &key)? else {
        return Ok(None);
    };

    match PreferenceSnapshot::from_value(document) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(err) => {
            tracing::warn!(
                user_id = %user_id,
                key = %key,
                error = %err,
                "Server document is not a valid snapshot; treating as absent"
            );
            Ok(None)
        }
    }
}

fn load_cached_snapshot(
    cache: &dyn CacheStore,
    user_id: &str,
    keys: &KeySpace,
) -> Result<Option<PreferenceSnapshot>> {
    let key = keys.cache_key(user_id);
    let Some(payload) = cache.read(&key)? else {
        return Ok(None);
    };

    match PreferenceSnapshot::from_json(&payload) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(err) => {
            tracing::warn!(
                user_id = %user_id,
                key = %key,
                error = %err,
                "Cached payload is not a valid snapshot; treating as absent"
            );
            Ok(None)
        }
    }
}

/// Restore preferences for the configured user and build a session.
///
/// Returns `Ok(None)` when the configuration names no user. Store errors
/// propagate; stored documents that fail to decode are treated as absent
/// so one corrupt copy cannot block startup.
pub fn bootstrap(
    config: &BootstrapConfig,
    remote: &dyn RemoteStore,
    cache: Arc<dyn CacheStore>,
    legacy: &dyn LegacyConverter,
) -> Result<Option<Session>> {
    let Some(user_id) = config.user_id.clone() else {
        tracing::debug!("No user identity; skipping preference bootstrap");
        return Ok(None);
    };

    let keys = KeySpace::new(config.tenant_prefix.clone());

    let server = load_server_snapshot(remote, &user_id, &keys)?;
    let local = load_cached_snapshot(cache.as_ref(), &user_id, &keys)?;

    let reconciled = reconcile(ReconcileInput::new(server, local), &user_id, legacy);

    let id = Uuid::new_v4();
    let source = reconciled.as_ref().map(|reconciled| reconciled.source);

    match source {
        Some(source) => {
            tracing::info!(
                session_id = %id,
                user_id = %user_id,
                source = %source,
                "Preferences restored"
            );
        }
        None => {
            tracing::info!(
                session_id = %id,
                user_id = %user_id,
                "No stored preferences; starting empty"
            );
        }
    }

    let preloaded = reconciled.map(Reconciled::into_snapshot).unwrap_or_default();
    let layer = Arc::new(PersistenceLayer::new(
        user_id.clone(),
        &keys,
        preloaded,
        cache,
    ));

    Ok(Some(Session {
        id,
        user_id,
        source,
        layer,
        autosave_interval: config.autosave_interval,
    }))
}
