//! The acting user.

use serde::{Deserialize, Serialize};

use gridguard_core::types::UserId;
use gridguard_entity::user::User;

/// Who is asking, as far as authorization is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user.
    pub user_id: UserId,
    /// Platform super administrator flag.
    pub is_super_admin: bool,
}

impl Actor {
    /// A regular (non-privileged) user.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_super_admin: false,
        }
    }

    /// A platform super administrator.
    pub fn super_admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_super_admin: true,
        }
    }

    /// Whether the actor holds platform-wide privileges.
    pub fn is_privileged(&self) -> bool {
        self.is_super_admin
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            is_super_admin: user.is_super_admin,
        }
    }
}
