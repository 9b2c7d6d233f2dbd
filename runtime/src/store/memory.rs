//! In-memory storage backends.
//!
//! Used by tests and by embedded hosts that manage durability themselves.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use super::{CacheStore, RemoteStore, StoreError};

/// In-memory remote store, one document slot per (user, key) pair.
///
/// Thread-safe and can be shared across tasks via `Arc`.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    documents: DashMap<(String, String), Value>,
}

impl MemoryRemoteStore {
    /// Create a new empty remote store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Create a new remote store wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Seed a document, bypassing the trait surface.
    pub fn seed(&self, user_id: &str, key: &str, document: Value) {
        self.documents
            .insert((user_id.to_string(), key.to_string()), document);
    }

    /// Number of stored documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn load(&self, user_id: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let slot = (user_id.to_string(), key.to_string());
        Ok(self.documents.get(&slot).map(|entry| entry.value().clone()))
    }

    fn save(&self, user_id: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        self.documents
            .insert((user_id.to_string(), key.to_string()), document.clone());
        Ok(())
    }
}

/// In-memory cache store keyed by opaque cache keys.
///
/// Thread-safe and can be shared across tasks via `Arc`.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, String>,
}

impl MemoryCacheStore {
    /// Create a new empty cache store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Create a new cache store wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Seed a cache entry, bypassing the trait surface.
    pub fn seed(&self, key: &str, payload: &str) {
        self.entries.insert(key.to_string(), payload.to_string());
    }

    /// Number of cached entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
