//! Grant targets: who a grant applies to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use gridguard_core::AppError;
use gridguard_core::types::UserId;

use crate::member::MemberRole;

/// Kind of subject a grant targets.
///
/// Ordered by resolution priority: SpecificUser > SpecificRole > AllMembers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "grant_target_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Every member of the database.
    AllMembers,
    /// One named user.
    SpecificUser,
    /// Every member holding one role.
    SpecificRole,
}

impl TargetType {
    /// Resolution priority (higher wins).
    pub fn priority(&self) -> u8 {
        match self {
            Self::SpecificUser => 3,
            Self::SpecificRole => 2,
            Self::AllMembers => 1,
        }
    }

    /// Return the target type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllMembers => "all_members",
            Self::SpecificUser => "specific_user",
            Self::SpecificRole => "specific_role",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all_members" => Ok(Self::AllMembers),
            "specific_user" => Ok(Self::SpecificUser),
            "specific_role" => Ok(Self::SpecificRole),
            _ => Err(AppError::invalid_target(format!(
                "Invalid target type: '{s}'. \
                 Expected one of: all_members, specific_user, specific_role"
            ))),
        }
    }
}

/// The subject of a grant, carrying the data its kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target_type", rename_all = "snake_case")]
pub enum GrantTarget {
    /// Applies to every member.
    AllMembers,
    /// Applies to one user.
    SpecificUser {
        /// Targeted user.
        user_id: UserId,
    },
    /// Applies to every member with a role.
    SpecificRole {
        /// Targeted role.
        role: MemberRole,
    },
}

impl GrantTarget {
    /// Build a target from request input.
    ///
    /// `target_type` must name one of the three kinds; user targets need a
    /// user id and role targets need a valid role.
    pub fn parse(
        target_type: &str,
        user_id: Option<UserId>,
        role: Option<&str>,
    ) -> Result<Self, AppError> {
        match target_type.parse::<TargetType>()? {
            TargetType::AllMembers => Ok(Self::AllMembers),
            TargetType::SpecificUser => user_id
                .map(|user_id| Self::SpecificUser { user_id })
                .ok_or_else(|| {
                    AppError::invalid_target("User ID is required for specific_user target type")
                }),
            TargetType::SpecificRole => {
                let role = role.ok_or_else(|| {
                    AppError::invalid_role("Role is required for specific_role target type")
                })?;
                Ok(Self::SpecificRole {
                    role: role.parse()?,
                })
            }
        }
    }

    /// Rebuild a target from stored columns, `None` if they are inconsistent.
    pub fn from_parts(
        target_type: TargetType,
        user_id: Option<UserId>,
        role: Option<MemberRole>,
    ) -> Option<Self> {
        match target_type {
            TargetType::AllMembers => Some(Self::AllMembers),
            TargetType::SpecificUser => user_id.map(|user_id| Self::SpecificUser { user_id }),
            TargetType::SpecificRole => role.map(|role| Self::SpecificRole { role }),
        }
    }

    /// The kind of this target.
    pub fn target_type(&self) -> TargetType {
        match self {
            Self::AllMembers => TargetType::AllMembers,
            Self::SpecificUser { .. } => TargetType::SpecificUser,
            Self::SpecificRole { .. } => TargetType::SpecificRole,
        }
    }

    /// Targeted user, for user targets.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::SpecificUser { user_id } => Some(*user_id),
            Self::AllMembers | Self::SpecificRole { .. } => None,
        }
    }

    /// Targeted role, for role targets.
    pub fn role(&self) -> Option<MemberRole> {
        match self {
            Self::SpecificRole { role } => Some(*role),
            Self::AllMembers | Self::SpecificUser { .. } => None,
        }
    }

    /// Whether this target names the given user acting with `role`.
    ///
    /// A user without membership (`role == None`) never matches role targets.
    pub fn applies_to(&self, user_id: UserId, role: Option<MemberRole>) -> bool {
        match self {
            Self::AllMembers => true,
            Self::SpecificUser { user_id: target } => *target == user_id,
            Self::SpecificRole { role: target } => role == Some(*target),
        }
    }
}

impl fmt::Display for GrantTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllMembers => write!(f, "all_members"),
            Self::SpecificUser { user_id } => write!(f, "user:{user_id}"),
            Self::SpecificRole { role } => write!(f, "role:{role}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridguard_core::ErrorKind;

    #[test]
    fn test_priority_order() {
        assert!(TargetType::SpecificUser.priority() > TargetType::SpecificRole.priority());
        assert!(TargetType::SpecificRole.priority() > TargetType::AllMembers.priority());
    }

    #[test]
    fn test_parse_rejects_unknown_target_type() {
        let err = GrantTarget::parse("everyone", None, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTarget);
    }

    #[test]
    fn test_parse_user_target_requires_user_id() {
        let err = GrantTarget::parse("specific_user", None, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTarget);

        let user_id = UserId::new();
        assert_eq!(
            GrantTarget::parse("specific_user", Some(user_id), None).unwrap(),
            GrantTarget::SpecificUser { user_id }
        );
    }

    #[test]
    fn test_parse_role_target_validates_role() {
        assert_eq!(
            GrantTarget::parse("specific_role", None, Some("manager")).unwrap(),
            GrantTarget::SpecificRole {
                role: MemberRole::Manager
            }
        );
        let err = GrantTarget::parse("specific_role", None, Some("guest")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRole);
        let err = GrantTarget::parse("specific_role", None, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRole);
    }

    #[test]
    fn test_applies_to() {
        let me = UserId::new();
        let other = UserId::new();

        assert!(GrantTarget::AllMembers.applies_to(me, None));
        assert!(GrantTarget::SpecificUser { user_id: me }.applies_to(me, None));
        assert!(!GrantTarget::SpecificUser { user_id: other }.applies_to(me, None));

        let members = GrantTarget::SpecificRole {
            role: MemberRole::Member,
        };
        assert!(members.applies_to(me, Some(MemberRole::Member)));
        assert!(!members.applies_to(me, Some(MemberRole::Manager)));
        assert!(!members.applies_to(me, None));
    }

    #[test]
    fn test_from_parts_drops_inconsistent_rows() {
        assert!(GrantTarget::from_parts(TargetType::SpecificUser, None, None).is_none());
        assert!(GrantTarget::from_parts(TargetType::SpecificRole, None, None).is_none());
        assert_eq!(
            GrantTarget::from_parts(TargetType::AllMembers, Some(UserId::new()), None),
            Some(GrantTarget::AllMembers)
        );
    }
}
