//! # Prefsync Runtime
//!
//! Host-side runtime around [`prefsync_engine`]: storage backends, session
//! bootstrap and write-through persistence.
//!
//! The engine decides which snapshot wins; this crate does the IO around
//! that decision. A host wires up a [`RemoteStore`], a [`CacheStore`] and a
//! legacy converter, then calls [`bootstrap`] once at startup:
//!
//! ```
//! use prefsync_engine::NoLegacyData;
//! use prefsync_runtime::{bootstrap, BootstrapConfig, MemoryCacheStore, MemoryRemoteStore};
//!
//! # fn main() -> prefsync_runtime::Result<()> {
//! let remote = MemoryRemoteStore::new();
//! let cache = MemoryCacheStore::new_shared();
//!
//! let config = BootstrapConfig::new().with_user("42");
//! let session = bootstrap(&config, &remote, cache, &NoLegacyData)?.unwrap();
//!
//! session.layer().set("theme", serde_json::json!("dark"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Long-running hosts keep the session's autosave task alive so dirty
//! snapshots reach the remote store without explicit flushes.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod layer;
pub mod legacy;
pub mod store;

pub use bootstrap::{bootstrap, Session};
pub use config::{BootstrapConfig, ConfigError};
pub use error::{Result, RuntimeError};
pub use layer::{spawn_autosave, PersistenceLayer};
pub use legacy::CacheLegacyConverter;
pub use store::{CacheStore, MemoryCacheStore, MemoryRemoteStore, RemoteStore, StoreError};
