//! Storage abstractions for preference documents.
//!
//! These traits define the contract that storage backends must implement.
//! By using traits, we enable:
//! - In-memory backends for testing and embedded use
//! - HTTP or database backends for production

use serde_json::Value;
use thiserror::Error;

mod memory;

pub use memory::{MemoryCacheStore, MemoryRemoteStore};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend error.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Server-side storage of preference documents, one per user.
///
/// The remote store is the durable copy. Loads happen once at bootstrap,
/// saves happen on autosave flushes.
pub trait RemoteStore: Send + Sync {
    /// Load the preference document stored under `key` for `user_id`.
    fn load(&self, user_id: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `document` under `key` for `user_id`, replacing any previous copy.
    fn save(&self, user_id: &str, key: &str, document: &Value) -> Result<(), StoreError>;
}

/// Device-local cache of serialized preference payloads.
///
/// The cache is written on every preference change so an offline session
/// can restore the latest state without the remote store.
pub trait CacheStore: Send + Sync {
    /// Read the raw payload stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `payload` under `key`, replacing any previous value.
    fn write(&self, key: &str, payload: &str) -> Result<(), StoreError>;
}
