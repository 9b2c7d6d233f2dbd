//! # Prefsync Engine
//!
//! A deterministic reconciliation engine for persisted user preferences.
//!
//! This crate provides the core logic for deciding, at session bootstrap,
//! which copy of a user's preferences is authoritative: the server copy,
//! the locally cached copy, or a conversion of legacy-format data. The
//! decision is a total function of its inputs - the same inputs always
//! produce the same outcome.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or platform
//! - **Deterministic**: Same inputs always produce same outputs
//! - **Fail-soft**: Mangled metadata loses; it never errors
//! - **Testable**: Pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Snapshots
//!
//! A [`PreferenceSnapshot`] is one user's complete preference document: a
//! flat map of opaque JSON values plus a reserved `__modified` timestamp.
//! On the wire it is a single JSON object, and serialization order is
//! deterministic.
//!
//! ### Reconciliation
//!
//! [`reconcile`](reconcile::reconcile) chooses between the server and
//! local copies by comparing their timestamps fail-soft: absent or
//! unparseable timestamps read as the Unix epoch, the newer copy wins,
//! and equal timestamps resolve to the server. The winner comes back as a
//! [`Reconciled`] carrying its [`SnapshotSource`].
//!
//! ### Legacy conversion
//!
//! When neither copy exists, a [`LegacyConverter`] gets one chance to
//! recover preferences from an older storage layout. [`NoLegacyData`] is
//! the null strategy.
//!
//! ## Quick Start
//!
//! ```rust
//! use prefsync_engine::{reconcile, NoLegacyData, PreferenceSnapshot, ReconcileInput, SnapshotSource};
//!
//! let server = PreferenceSnapshot::from_json(
//!     r#"{"__modified":"2024-06-01T10:00:00Z","theme":"dark"}"#,
//! ).unwrap();
//! let local = PreferenceSnapshot::from_json(
//!     r#"{"__modified":"2024-05-01T09:00:00Z","theme":"light"}"#,
//! ).unwrap();
//!
//! let winner = reconcile(
//!     ReconcileInput::new(Some(server), Some(local)),
//!     "42",
//!     &NoLegacyData,
//! ).unwrap();
//!
//! assert_eq!(winner.source, SnapshotSource::Server);
//! assert_eq!(winner.snapshot.get("theme"), Some(&serde_json::json!("dark")));
//! ```
//!
//! ## Storage keys
//!
//! [`KeySpace`] derives the tenant-scoped server key and the per-user
//! cache keys, so every store implementation agrees on where a user's
//! data lives.

pub mod error;
pub mod keys;
pub mod legacy;
pub mod reconcile;
pub mod snapshot;
pub mod timestamp;

// Re-export main types at crate root
pub use error::Error;
pub use keys::{KeySpace, CACHE_KEY_PREFIX, LEGACY_CACHE_KEY_PREFIX};
pub use legacy::{convert_blob, LegacyConverter, NoLegacyData};
pub use reconcile::{reconcile, ReconcileInput, Reconciled, SnapshotSource};
pub use snapshot::{PreferenceSnapshot, MODIFIED_KEY};

/// Type aliases for clarity
pub type PreferenceKey = String;
pub type UserId = String;
pub type TenantPrefix = String;
pub type EpochMillis = i64;
