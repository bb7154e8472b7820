//! Database membership role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a user holds inside one database.
///
/// Owners and managers administer permissions and are never restricted by
/// grants; members are subject to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Owns the database.
    Owner,
    /// Manages members and permissions.
    Manager,
    /// Regular member.
    Member,
}

impl MemberRole {
    /// Check if this role may administer grants and bypasses them.
    pub fn is_manager_or_above(&self) -> bool {
        matches!(self, Self::Owner | Self::Manager)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = gridguard_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "manager" => Ok(Self::Manager),
            "member" => Ok(Self::Member),
            _ => Err(gridguard_core::AppError::invalid_role(format!(
                "Invalid role: '{s}'. Expected one of: owner, manager, member"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridguard_core::ErrorKind;

    #[test]
    fn test_manager_or_above() {
        assert!(MemberRole::Owner.is_manager_or_above());
        assert!(MemberRole::Manager.is_manager_or_above());
        assert!(!MemberRole::Member.is_manager_or_above());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Owner".parse::<MemberRole>().unwrap(), MemberRole::Owner);
        assert_eq!(" member ".parse::<MemberRole>().unwrap(), MemberRole::Member);
        let err = "admin".parse::<MemberRole>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRole);
    }
}
