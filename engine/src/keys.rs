//! Storage-key derivation.
//!
//! The server document is namespaced per tenant; cache entries are
//! namespaced per user. Derivation is pure string work shared by every
//! store implementation, so both sides of the runtime agree on where a
//! user's data lives.

/// Cache key prefix for the entry holding a user's current snapshot.
pub const CACHE_KEY_PREFIX: &str = "PREFS_USER_";

/// Cache key prefix for the entry holding a user's legacy-format data.
pub const LEGACY_CACHE_KEY_PREFIX: &str = "PREFS_DATA_USER_";

/// Base name of the per-user server document.
const SERVER_KEY_NAME: &str = "persisted_preferences";

/// Key derivation for one tenant.
///
/// The tenant prefix scopes the server document (an empty prefix is a
/// single-tenant deployment). Cache keys are per user and deliberately
/// unprefixed: the cache itself is already private to one host profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySpace {
    tenant_prefix: String,
}

impl KeySpace {
    /// Create a keyspace with a tenant prefix (may be empty).
    pub fn new(tenant_prefix: impl Into<String>) -> Self {
        Self {
            tenant_prefix: tenant_prefix.into(),
        }
    }

    /// Key of the per-user server document within this tenant.
    pub fn server_key(&self) -> String {
        format!("{}{}", self.tenant_prefix, SERVER_KEY_NAME)
    }

    /// Cache key of a user's current snapshot.
    pub fn cache_key(&self, user_id: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, user_id)
    }

    /// Cache key of a user's legacy-format data.
    pub fn legacy_cache_key(&self, user_id: &str) -> String {
        format!("{}{}", LEGACY_CACHE_KEY_PREFIX, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_key_uses_tenant_prefix() {
        assert_eq!(
            KeySpace::new("app_").server_key(),
            "app_persisted_preferences"
        );
        assert_eq!(
            KeySpace::new("app_2_").server_key(),
            "app_2_persisted_preferences"
        );
        assert_eq!(KeySpace::default().server_key(), "persisted_preferences");
    }

    #[test]
    fn cache_keys_are_per_user() {
        let keys = KeySpace::new("app_");

        assert_eq!(keys.cache_key("42"), "PREFS_USER_42");
        assert_eq!(keys.cache_key("43"), "PREFS_USER_43");
        assert_ne!(keys.cache_key("42"), keys.cache_key("43"));
    }

    #[test]
    fn legacy_cache_key_is_distinct() {
        let keys = KeySpace::default();

        assert_eq!(keys.legacy_cache_key("42"), "PREFS_DATA_USER_42");
        assert_ne!(keys.legacy_cache_key("42"), keys.cache_key("42"));
    }
}
