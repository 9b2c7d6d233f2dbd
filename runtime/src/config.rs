//! Configuration for the preference bootstrap.

use std::env;
use std::time::Duration;

use prefsync_engine::{TenantPrefix, UserId};

const DEFAULT_AUTOSAVE_MS: u64 = 5000;

/// Bootstrap configuration.
///
/// Collects everything the runtime needs to restore preferences for a
/// session: who the user is, which tenant namespace to read from, and how
/// often dirty preferences are pushed back to the server.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Identity of the current user, if any. Without one the bootstrap
    /// is skipped entirely.
    pub user_id: Option<UserId>,
    /// Tenant namespace prepended to the server-side document key.
    pub tenant_prefix: TenantPrefix,
    /// Interval between autosave flushes.
    pub autosave_interval: Duration,
}

impl BootstrapConfig {
    /// Create a configuration with the defaults: no user, empty tenant
    /// prefix, 5 second autosave interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// An empty `PREFSYNC_USER_ID` counts as absent. `PREFSYNC_AUTOSAVE_MS`
    /// must parse to a non-zero number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let user_id = env::var("PREFSYNC_USER_ID").ok().filter(|id| !id.is_empty());

        let tenant_prefix = env::var("PREFSYNC_TENANT_PREFIX").unwrap_or_default();

        let autosave_ms: u64 = env::var("PREFSYNC_AUTOSAVE_MS")
            .unwrap_or_else(|_| DEFAULT_AUTOSAVE_MS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAutosaveInterval)?;
        if autosave_ms == 0 {
            return Err(ConfigError::InvalidAutosaveInterval);
        }

        Ok(Self {
            user_id,
            tenant_prefix,
            autosave_interval: Duration::from_millis(autosave_ms),
        })
    }

    /// Set the user identity.
    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the tenant namespace prefix.
    pub fn with_tenant_prefix(mut self, prefix: impl Into<TenantPrefix>) -> Self {
        self.tenant_prefix = prefix.into();
        self
    }

    /// Set the interval between autosave flushes.
    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            tenant_prefix: TenantPrefix::new(),
            autosave_interval: Duration::from_millis(DEFAULT_AUTOSAVE_MS),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PREFSYNC_AUTOSAVE_MS value")]
    InvalidAutosaveInterval,
}
