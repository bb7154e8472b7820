//! Membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gridguard_core::types::{DatabaseId, UserId};

use super::role::MemberRole;
use crate::user::UserSummary;

/// A user's membership in one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Member user.
    pub user_id: UserId,
    /// Database the membership belongs to.
    pub database_id: DatabaseId,
    /// Role inside the database.
    pub role: MemberRole,
    /// When the user joined.
    pub created_at: DateTime<Utc>,
}

/// A membership joined with the member's display data, for target pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberView {
    /// Member display data.
    pub user: UserSummary,
    /// Role inside the database.
    pub role: MemberRole,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
}
