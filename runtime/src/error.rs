use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Top-level runtime error type.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Engine error: {0}")]
    Engine(#[from] prefsync_engine::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
