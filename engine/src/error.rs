//! Error types for the Prefsync engine.

use crate::PreferenceKey;
use thiserror::Error;

/// All possible errors from the Prefsync engine.
///
/// Reconciliation itself is total and never returns these; they belong to
/// the snapshot codec and the mutation API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Codec errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    // Mutation errors
    #[error("reserved key: {0}")]
    ReservedKey(PreferenceKey),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
