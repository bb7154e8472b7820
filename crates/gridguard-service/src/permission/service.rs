//! Grant management: create, list, update, delete grants and resolve
//! effective access on tables, columns, records and cells.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};
use validator::Validate;

use gridguard_auth::acl::{AccessDecision, filter_viewable, group_by_resource, resolve};
use gridguard_auth::membership::RoleResolver;
use gridguard_auth::rbac::{RbacEnforcer, bypasses_grants};
use gridguard_auth::Actor;
use gridguard_core::config::PermissionConfig;
use gridguard_core::error::{AppError, ErrorKind};
use gridguard_core::result::AppResult;
use gridguard_core::types::{DatabaseId, GrantId, TableId, UserId};
use gridguard_database::store::Stores;
use gridguard_entity::grant::{
    CreateGrantRequest, GrantPatch, GrantTarget, GrantView, NewGrant, PermissionGrant,
    ResourceRef, ResourceScope,
};
use gridguard_entity::member::{MemberRole, MemberView};
use gridguard_entity::user::UserSummary;

use super::location::LocatedResource;
use crate::context::RequestContext;

/// Manages grants and answers access questions.
#[derive(Debug, Clone)]
pub struct GrantService {
    /// Grant, membership, user and catalog stores.
    stores: Stores,
    /// Cached membership roles.
    roles: RoleResolver,
    /// Grant administration checks.
    rbac: RbacEnforcer,
    /// Permission settings.
    config: PermissionConfig,
}

impl GrantService {
    /// Creates a new grant service.
    pub fn new(stores: Stores, config: PermissionConfig) -> Self {
        let roles = RoleResolver::new(stores.members.clone(), &config);
        Self {
            stores,
            roles,
            rbac: RbacEnforcer::new(),
            config,
        }
    }

    /// Request context for an existing user.
    pub async fn context_for(&self, user_id: UserId) -> AppResult<RequestContext> {
        let user = self
            .stores
            .users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found(format!("User {user_id} not found")))?;
        Ok(RequestContext::from_user(&user))
    }

    /// The membership role resolver, for invalidation after membership changes.
    pub fn roles(&self) -> &RoleResolver {
        &self.roles
    }

    /// Creates a grant on `resource`.
    ///
    /// The requester must own or manage the resource's database. When no
    /// name is given one is derived from the resource.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
        req: CreateGrantRequest,
    ) -> AppResult<GrantView> {
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid grant: {e}")))?;

        let located = self.locate(resource).await?;
        self.require_manager(ctx, located.database_id()).await?;

        let target = GrantTarget::parse(&req.target_type, req.user_id, req.role.as_deref())?;
        if let GrantTarget::SpecificUser { user_id } = target {
            self.stores
                .users
                .find_user(user_id)
                .await?
                .ok_or_else(|| AppError::user_not_found(format!("User {user_id} not found")))?;
        }

        let grant = self
            .stores
            .grants
            .insert(NewGrant {
                resource,
                table_id: located.table_id(),
                database_id: located.database_id(),
                target,
                can_view: req.can_view.unwrap_or(true),
                can_edit: req.can_edit.unwrap_or(true),
                name: req.name.unwrap_or_else(|| located.default_grant_name()),
                note: req.note.unwrap_or_default(),
                is_default: false,
                created_by: Some(ctx.user_id),
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            grant_id = %grant.id,
            resource = %grant.resource,
            target = %grant.target,
            can_view = grant.can_view,
            can_edit = grant.can_edit,
            "Permission grant created"
        );

        self.enrich_one(grant).await
    }

    /// Lists the grants attached to `resource`, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
    ) -> AppResult<Vec<GrantView>> {
        let located = self.locate(resource).await?;
        self.require_manager(ctx, located.database_id()).await?;

        let grants = self.stores.grants.list_for_resource(&resource).await?;
        self.enrich(grants).await
    }

    /// Lists every grant of one scope under a table, newest first.
    pub async fn list_for_table(
        &self,
        ctx: &RequestContext,
        table_id: TableId,
        scope: ResourceScope,
    ) -> AppResult<Vec<GrantView>> {
        let table = self
            .stores
            .locator
            .find_table(table_id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Table {table_id} not found")))?;
        self.require_manager(ctx, table.database_id).await?;

        let grants = self.stores.grants.list_for_table(table_id, scope).await?;
        self.enrich(grants).await
    }

    /// Changes the name, flags or note of a grant.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        grant_id: GrantId,
        patch: GrantPatch,
    ) -> AppResult<GrantView> {
        patch
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid grant update: {e}")))?;

        let existing = self.find_grant(grant_id).await?;
        self.require_manager(ctx, existing.database_id).await?;

        if patch.is_empty() {
            return self.enrich_one(existing).await;
        }

        let grant = self.stores.grants.update(grant_id, &patch).await?;

        info!(
            user_id = %ctx.user_id,
            grant_id = %grant.id,
            can_view = grant.can_view,
            can_edit = grant.can_edit,
            "Permission grant updated"
        );

        self.enrich_one(grant).await
    }

    /// Deletes a grant. Default grants can never be deleted.
    pub async fn delete(&self, ctx: &RequestContext, grant_id: GrantId) -> AppResult<()> {
        let grant = self.find_grant(grant_id).await?;
        if grant.is_default {
            return Err(AppError::cannot_delete_default(format!(
                "Permission {grant_id} is a default permission and cannot be deleted"
            )));
        }
        self.require_manager(ctx, grant.database_id).await?;

        if !self.stores.grants.delete(grant_id).await? {
            return Err(AppError::not_found(format!("Permission {grant_id} not found")));
        }

        info!(
            user_id = %ctx.user_id,
            grant_id = %grant_id,
            resource = %grant.resource,
            "Permission grant deleted"
        );

        Ok(())
    }

    /// Resolves what `actor` may do on `resource`.
    ///
    /// Grants are not loaded for actors who bypass resolution.
    pub async fn effective_access(
        &self,
        actor: &Actor,
        resource: ResourceRef,
    ) -> AppResult<AccessDecision> {
        let located = self.locate(resource).await?;
        let role = self
            .roles
            .resolve_role(actor.user_id, located.database_id())
            .await?;

        let grants = if bypasses_grants(actor, role) {
            Vec::new()
        } else {
            self.stores.grants.list_for_resource(&resource).await?
        };
        let decision = resolve(&grants, actor, role);

        debug!(
            user_id = %actor.user_id,
            resource = %resource,
            can_view = decision.can_view,
            can_edit = decision.can_edit,
            source = ?decision.source,
            "Resolved effective access"
        );

        Ok(decision)
    }

    /// Fails with `PermissionDenied` unless `actor` may view `resource`.
    pub async fn require_view(
        &self,
        actor: &Actor,
        resource: ResourceRef,
    ) -> AppResult<AccessDecision> {
        let decision = self.effective_access(actor, resource).await?;
        if !decision.can_view {
            return Err(AppError::permission_denied(format!(
                "You do not have permission to view {resource}"
            )));
        }
        Ok(decision)
    }

    /// Fails with `PermissionDenied` unless `actor` may edit `resource`.
    pub async fn require_edit(
        &self,
        actor: &Actor,
        resource: ResourceRef,
    ) -> AppResult<AccessDecision> {
        let decision = self.effective_access(actor, resource).await?;
        if !decision.can_edit {
            return Err(AppError::permission_denied(format!(
                "You do not have permission to edit {resource}"
            )));
        }
        Ok(decision)
    }

    /// The columns or records of a table `actor` may view, in table order.
    ///
    /// One grant fetch covers the whole table; none happens for actors who
    /// bypass resolution.
    pub async fn visible_resources(
        &self,
        actor: &Actor,
        table_id: TableId,
        scope: ResourceScope,
    ) -> AppResult<Vec<ResourceRef>> {
        let table = self
            .stores
            .locator
            .find_table(table_id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Table {table_id} not found")))?;

        let resources: Vec<ResourceRef> = match scope {
            ResourceScope::Column => self
                .stores
                .locator
                .list_columns(table_id)
                .await?
                .into_iter()
                .map(|c| ResourceRef::Column { column_id: c.id })
                .collect(),
            ResourceScope::Record => self
                .stores
                .locator
                .list_records(table_id)
                .await?
                .into_iter()
                .map(|r| ResourceRef::Record { record_id: r.id })
                .collect(),
            ResourceScope::Table | ResourceScope::Cell => {
                return Err(AppError::validation(format!(
                    "Visible resources can be listed for columns or records, not {scope}"
                )));
            }
        };

        let role = self
            .roles
            .resolve_role(actor.user_id, table.database_id)
            .await?;
        if bypasses_grants(actor, role) {
            return Ok(resources);
        }

        let grouped = group_by_resource(self.stores.grants.list_for_table(table_id, scope).await?);
        Ok(filter_viewable(resources, &grouped, actor, role))
    }

    /// Creates the protected all-members grant on `resource` if missing.
    ///
    /// Returns the existing grant when one is already there, and `None` when
    /// default seeding is disabled.
    pub async fn seed_default(
        &self,
        resource: ResourceRef,
        created_by: Option<UserId>,
    ) -> AppResult<Option<PermissionGrant>> {
        if !self.config.seed_default_grants {
            return Ok(None);
        }

        if let Some(existing) = self.find_all_members_grant(&resource).await? {
            return Ok(Some(existing));
        }

        let located = self.locate(resource).await?;
        let inserted = self
            .stores
            .grants
            .insert(NewGrant {
                resource,
                table_id: located.table_id(),
                database_id: located.database_id(),
                target: GrantTarget::AllMembers,
                can_view: true,
                can_edit: true,
                name: located.default_grant_name(),
                note: String::new(),
                is_default: true,
                created_by,
            })
            .await;

        match inserted {
            Ok(grant) => {
                info!(grant_id = %grant.id, resource = %resource, "Default permission seeded");
                Ok(Some(grant))
            }
            // Lost a race with a concurrent seed or create.
            Err(e) if e.is(ErrorKind::DuplicateGrant) => {
                self.find_all_members_grant(&resource).await
            }
            Err(e) => Err(e),
        }
    }

    /// Members of a database with their roles, for target pickers.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        database_id: DatabaseId,
    ) -> AppResult<Vec<MemberView>> {
        self.require_manager(ctx, database_id).await?;

        let members = self.stores.members.list_members(database_id).await?;
        let ids: Vec<UserId> = members.iter().map(|m| m.user_id).collect();
        let users = self.summaries(&ids).await?;

        Ok(members
            .into_iter()
            .filter_map(|m| {
                users.get(&m.user_id).map(|user| MemberView {
                    user: user.clone(),
                    role: m.role,
                    joined_at: m.created_at,
                })
            })
            .collect())
    }

    // ── Internal helpers ─────────────────────────────────────────────

    async fn locate(&self, resource: ResourceRef) -> AppResult<LocatedResource> {
        LocatedResource::locate(self.stores.locator.as_ref(), resource).await
    }

    async fn find_grant(&self, grant_id: GrantId) -> AppResult<PermissionGrant> {
        self.stores
            .grants
            .find_by_id(grant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Permission {grant_id} not found")))
    }

    async fn find_all_members_grant(
        &self,
        resource: &ResourceRef,
    ) -> AppResult<Option<PermissionGrant>> {
        self.stores
            .grants
            .find_by_target(resource, &GrantTarget::AllMembers)
            .await
    }

    async fn require_manager(
        &self,
        ctx: &RequestContext,
        database_id: DatabaseId,
    ) -> AppResult<Option<MemberRole>> {
        let actor = ctx.actor();
        let role = self.roles.resolve_role(ctx.user_id, database_id).await?;
        self.rbac.require_grant_manager(&actor, role, database_id)?;
        Ok(role)
    }

    async fn summaries(&self, ids: &[UserId]) -> AppResult<HashMap<UserId, UserSummary>> {
        let unique: Vec<UserId> = ids
            .iter()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users = self.stores.users.find_summaries(&unique).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    async fn enrich(&self, grants: Vec<PermissionGrant>) -> AppResult<Vec<GrantView>> {
        let ids: Vec<UserId> = grants
            .iter()
            .flat_map(|g| [g.target.user_id(), g.created_by])
            .flatten()
            .collect();
        let users = self.summaries(&ids).await?;

        Ok(grants
            .into_iter()
            .map(|grant| GrantView {
                target_user: grant.target.user_id().and_then(|id| users.get(&id).cloned()),
                creator: grant.created_by.and_then(|id| users.get(&id).cloned()),
                grant,
            })
            .collect())
    }

    async fn enrich_one(&self, grant: PermissionGrant) -> AppResult<GrantView> {
        self.enrich(vec![grant])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Grant enrichment returned nothing"))
    }
}
