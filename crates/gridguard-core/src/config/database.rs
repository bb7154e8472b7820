//! `[database]` section: the PostgreSQL pool holding grants, memberships
//! and the table catalog.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Grant store pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL of the grant store.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open while idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_acquire_timeout")]
    pub connect_timeout_seconds: u64,
    /// Seconds before an idle connection is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Acquire timeout for pooled connections.
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Idle timeout, `None` when set to zero.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_seconds > 0).then(|| Duration::from_secs(self.idle_timeout_seconds))
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(idle: u64) -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://localhost/gridguard".to_string(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: 3,
            idle_timeout_seconds: idle,
        }
    }

    #[test]
    fn test_zero_idle_timeout_keeps_connections() {
        assert_eq!(config(0).idle_timeout(), None);
        assert_eq!(config(60).idle_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config(0).acquire_timeout(), Duration::from_secs(3));
    }
}
