//! Permission grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use gridguard_core::types::{DatabaseId, GrantId, TableId, UserId};

use super::scope::ResourceRef;
use super::target::GrantTarget;

/// One grant of view/edit access on a resource to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Unique grant identifier.
    pub id: GrantId,
    /// Resource the grant is attached to.
    pub resource: ResourceRef,
    /// Table containing the resource.
    pub table_id: TableId,
    /// Database containing the table.
    pub database_id: DatabaseId,
    /// Who the grant applies to.
    #[serde(flatten)]
    pub target: GrantTarget,
    /// Whether the target may view the resource.
    pub can_view: bool,
    /// Whether the target may edit the resource.
    pub can_edit: bool,
    /// Display name.
    pub name: String,
    /// Free-form note.
    pub note: String,
    /// System-seeded grants cannot be deleted.
    pub is_default: bool,
    /// User who created the grant (`None` for system-seeded grants).
    pub created_by: Option<UserId>,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// When the grant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PermissionGrant {
    /// Uniqueness key: one grant per resource and target.
    pub fn unique_key(&self) -> (ResourceRef, GrantTarget) {
        (self.resource, self.target)
    }
}

/// A validated grant ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGrant {
    /// Resource the grant is attached to.
    pub resource: ResourceRef,
    /// Table containing the resource.
    pub table_id: TableId,
    /// Database containing the table.
    pub database_id: DatabaseId,
    /// Who the grant applies to.
    pub target: GrantTarget,
    /// View flag.
    pub can_view: bool,
    /// Edit flag.
    pub can_edit: bool,
    /// Display name.
    pub name: String,
    /// Free-form note.
    pub note: String,
    /// Whether the grant is system-seeded.
    pub is_default: bool,
    /// Creator, if any.
    pub created_by: Option<UserId>,
}

impl NewGrant {
    /// Uniqueness key of the grant this would create.
    pub fn unique_key(&self) -> (ResourceRef, GrantTarget) {
        (self.resource, self.target)
    }

    /// Materialize the grant with a fresh id and timestamps.
    pub fn into_grant(self, now: DateTime<Utc>) -> PermissionGrant {
        PermissionGrant {
            id: GrantId::new(),
            resource: self.resource,
            table_id: self.table_id,
            database_id: self.database_id,
            target: self.target,
            can_view: self.can_view,
            can_edit: self.can_edit,
            name: self.name,
            note: self.note,
            is_default: self.is_default,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw grant creation input, before target validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateGrantRequest {
    /// `all_members`, `specific_user` or `specific_role`.
    pub target_type: String,
    /// Targeted user for `specific_user`.
    pub user_id: Option<UserId>,
    /// Targeted role for `specific_role`.
    pub role: Option<String>,
    /// View flag (defaults to `true`).
    pub can_view: Option<bool>,
    /// Edit flag (defaults to `true`).
    pub can_edit: Option<bool>,
    /// Display name; derived from the resource when absent.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Free-form note.
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Mutable fields of a grant. Scope, target and `is_default` are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GrantPatch {
    /// New display name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New view flag.
    pub can_view: Option<bool>,
    /// New edit flag.
    pub can_edit: Option<bool>,
    /// New note.
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

impl GrantPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.can_view.is_none()
            && self.can_edit.is_none()
            && self.note.is_none()
    }

    /// Apply the patch in place, bumping `updated_at`.
    pub fn apply(&self, grant: &mut PermissionGrant, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            grant.name = name.clone();
        }
        if let Some(can_view) = self.can_view {
            grant.can_view = can_view;
        }
        if let Some(can_edit) = self.can_edit {
            grant.can_edit = can_edit;
        }
        if let Some(note) = &self.note {
            grant.note = note.clone();
        }
        grant.updated_at = now;
    }
}
