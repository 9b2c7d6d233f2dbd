//! Reconciliation logic for choosing the authoritative snapshot.
//!
//! This is the core of determinism. Given the server copy and the locally
//! cached copy of a user's preferences, this module decides which one the
//! session starts from, falling back to legacy conversion when neither
//! exists.
//!
//! # Algorithm
//!
//! 1. Read both timestamps fail-soft (absent or unparseable reads as the
//!    Unix epoch)
//! 2. Server copy present and at least as new as the local copy: server
//!    wins (equal timestamps resolve to the server)
//! 3. Otherwise the local copy wins when present
//! 4. Otherwise consult the legacy converter for this user
//! 5. Nothing anywhere: no snapshot
//!
//! The procedure is total: it never errors and never panics, whatever
//! state the inputs are in.

use crate::{LegacyConverter, PreferenceSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of the winning snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotSource {
    /// The server copy won
    Server,
    /// The locally cached copy won
    Local,
    /// Neither copy existed; legacy conversion produced the snapshot
    Legacy,
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SnapshotSource::Server => "server",
            SnapshotSource::Local => "local",
            SnapshotSource::Legacy => "legacy",
        };
        f.write_str(name)
    }
}

/// The two candidate snapshots for one session.
///
/// Built once per bootstrap and consumed exactly once; either side may be
/// absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconcileInput {
    /// The durable server copy, if one was stored
    pub server: Option<PreferenceSnapshot>,
    /// The locally cached copy, if one was stored
    pub local: Option<PreferenceSnapshot>,
}

impl ReconcileInput {
    /// Create an input from the two candidate snapshots.
    pub fn new(server: Option<PreferenceSnapshot>, local: Option<PreferenceSnapshot>) -> Self {
        Self { server, local }
    }
}

/// The winning snapshot plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciled {
    /// The authoritative snapshot for the session
    pub snapshot: PreferenceSnapshot,
    /// Where it came from
    pub source: SnapshotSource,
}

impl Reconciled {
    /// Discard the provenance, keeping the snapshot.
    pub fn into_snapshot(self) -> PreferenceSnapshot {
        self.snapshot
    }
}

/// Choose the authoritative snapshot for a session.
///
/// The newer copy wins whichever side it is on; equal timestamps resolve
/// to the server copy. A copy whose timestamp is absent or unparseable
/// competes with epoch zero, so it loses to any intact timestamp but is
/// never an error. Legacy conversion is consulted only when both copies
/// are absent; `None` means the user has no preferences anywhere.
pub fn reconcile(
    input: ReconcileInput,
    user_id: &str,
    legacy: &dyn LegacyConverter,
) -> Option<Reconciled> {
    let server_ms = input
        .server
        .as_ref()
        .map_or(0, PreferenceSnapshot::modified_epoch_ms);
    let local_ms = input
        .local
        .as_ref()
        .map_or(0, PreferenceSnapshot::modified_epoch_ms);

    if let Some(snapshot) = input.server {
        if server_ms >= local_ms {
            return Some(Reconciled {
                snapshot,
                source: SnapshotSource::Server,
            });
        }
        // Server copy is stale; fall through to the local copy.
    }

    if let Some(snapshot) = input.local {
        return Some(Reconciled {
            snapshot,
            source: SnapshotSource::Local,
        });
    }

    legacy.convert(user_id).map(|snapshot| Reconciled {
        snapshot,
        source: SnapshotSource::Legacy,
    })
}
