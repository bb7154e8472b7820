//! Effective access resolution over the grants of one resource.
//!
//! Resolution order:
//! 1. Bypass: super administrators, owners and managers get full access.
//! 2. No grants on the resource: full access.
//! 3. Keep only grants whose target names the actor (all members, the
//!    actor's user id, or the actor's role).
//! 4. Nothing applies: full access.
//! 5. The most specific target wins: user > role > all members.
//!
//! The winner's flags are returned as stored, except that edit access is
//! never granted without view access.

use serde::{Deserialize, Serialize};

use gridguard_core::types::GrantId;
use gridguard_entity::grant::{PermissionGrant, TargetType};
use gridguard_entity::member::MemberRole;

use crate::actor::Actor;

/// Outcome of resolving a resource for an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the actor may view the resource.
    pub can_view: bool,
    /// Whether the actor may edit the resource.
    pub can_edit: bool,
    /// Why the decision was made.
    pub source: DecisionSource,
}

/// Where a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionSource {
    /// Platform super administrator.
    PrivilegedBypass,
    /// Owner or manager of the database.
    RoleBypass {
        /// The bypassing role.
        role: MemberRole,
    },
    /// The resource has no grants.
    NoGrants,
    /// The resource has grants, none of which target the actor.
    NoApplicableGrant,
    /// A grant decided.
    Grant {
        /// The winning grant.
        grant_id: GrantId,
        /// Its target kind.
        target_type: TargetType,
    },
}

impl AccessDecision {
    /// Full access for the given reason.
    pub fn full(source: DecisionSource) -> Self {
        Self {
            can_view: true,
            can_edit: true,
            source,
        }
    }

    fn from_grant(grant: &PermissionGrant) -> Self {
        Self {
            can_view: grant.can_view,
            can_edit: grant.can_view && grant.can_edit,
            source: DecisionSource::Grant {
                grant_id: grant.id,
                target_type: grant.target.target_type(),
            },
        }
    }
}

/// Resolve the actor's access from the grants attached to one resource.
///
/// `role` is the actor's role in the resource's database, `None` when the
/// actor is not a member. Never fails.
pub fn resolve(
    grants: &[PermissionGrant],
    actor: &Actor,
    role: Option<MemberRole>,
) -> AccessDecision {
    if actor.is_privileged() {
        return AccessDecision::full(DecisionSource::PrivilegedBypass);
    }
    if let Some(role) = role.filter(MemberRole::is_manager_or_above) {
        return AccessDecision::full(DecisionSource::RoleBypass { role });
    }
    if grants.is_empty() {
        return AccessDecision::full(DecisionSource::NoGrants);
    }

    grants
        .iter()
        .filter(|g| g.target.applies_to(actor.user_id, role))
        .max_by_key(|g| g.target.target_type().priority())
        .map_or_else(
            || AccessDecision::full(DecisionSource::NoApplicableGrant),
            AccessDecision::from_grant,
        )
}
