//! Grants enriched with display data for admin listings.

use serde::{Deserialize, Serialize};

use super::model::PermissionGrant;
use crate::user::UserSummary;

/// A grant plus the target user's and creator's display data.
///
/// Display fields are a read-side convenience and play no part in
/// authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantView {
    /// The grant itself.
    #[serde(flatten)]
    pub grant: PermissionGrant,
    /// Targeted user, for user grants whose user still exists.
    pub target_user: Option<UserSummary>,
    /// Creator, when known.
    pub creator: Option<UserSummary>,
}
