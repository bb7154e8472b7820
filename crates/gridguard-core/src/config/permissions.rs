//! Permission engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for role resolution and grant lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// How long a resolved membership role stays cached.
    #[serde(default = "default_cache_ttl")]
    pub membership_cache_ttl_seconds: u64,
    /// Maximum number of cached (user, database) memberships.
    #[serde(default = "default_cache_capacity")]
    pub membership_cache_capacity: u64,
    /// Whether `seed` operations create the protected all-members grant.
    #[serde(default = "default_true")]
    pub seed_default_grants: bool,
}

impl PermissionConfig {
    /// Membership cache TTL as a [`Duration`].
    pub fn membership_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.membership_cache_ttl_seconds)
    }
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            membership_cache_ttl_seconds: default_cache_ttl(),
            membership_cache_capacity: default_cache_capacity(),
            seed_default_grants: default_true(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}
