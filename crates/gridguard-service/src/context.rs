//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gridguard_auth::Actor;
use gridguard_core::types::UserId;
use gridguard_entity::user::User;

/// Context for the current request.
///
/// Passed into service methods so every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// Platform super administrator flag.
    pub is_super_admin: bool,
    /// Display name, for logs.
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a known user.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            is_super_admin: user.is_super_admin,
            username: user.name.clone(),
            request_time: Utc::now(),
        }
    }

    /// The acting user as seen by authorization.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            is_super_admin: self.is_super_admin,
        }
    }
}
