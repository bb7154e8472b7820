//! Database role enforcement.
//!
//! Role hierarchy: Owner > Manager > Member. Owners and managers (and
//! platform super administrators) bypass grant resolution entirely and
//! are the only ones allowed to manage grants.

use gridguard_core::error::AppError;
use gridguard_core::types::DatabaseId;
use gridguard_entity::member::MemberRole;

use crate::actor::Actor;

/// Whether the actor skips grant resolution in a database where they hold `role`.
pub fn bypasses_grants(actor: &Actor, role: Option<MemberRole>) -> bool {
    actor.is_privileged() || role.is_some_and(|r| r.is_manager_or_above())
}

/// Enforces role requirements for grant administration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Whether the actor may create, list, update or delete grants.
    pub fn can_manage_grants(&self, actor: &Actor, role: Option<MemberRole>) -> bool {
        bypasses_grants(actor, role)
    }

    /// Fails with `PermissionDenied` unless the actor may manage grants in
    /// `database_id`.
    pub fn require_grant_manager(
        &self,
        actor: &Actor,
        role: Option<MemberRole>,
        database_id: DatabaseId,
    ) -> Result<(), AppError> {
        if self.can_manage_grants(actor, role) {
            return Ok(());
        }
        let held = role.map_or("none", |r| r.as_str());
        Err(AppError::permission_denied(format!(
            "Only database owners and managers can manage permissions \
             (database {database_id}, role '{held}')"
        )))
    }
}
