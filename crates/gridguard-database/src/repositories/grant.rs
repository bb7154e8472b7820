//! Permission grant repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;

use gridguard_core::error::{AppError, ErrorKind};
use gridguard_core::result::AppResult;
use gridguard_core::types::{ColumnId, DatabaseId, GrantId, RecordId, TableId, UserId};
use gridguard_entity::grant::{
    GrantPatch, GrantTarget, NewGrant, PermissionGrant, ResourceRef, ResourceScope, TargetType,
};
use gridguard_entity::member::MemberRole;

use crate::store::GrantStore;

/// Matches one resource. `$2` is only set for table resources.
const RESOURCE_FILTER: &str = "scope = $1 AND ($2::uuid IS NULL OR table_id = $2) \
     AND column_id IS NOT DISTINCT FROM $3 AND record_id IS NOT DISTINCT FROM $4";

/// Flat row of `permission_grants`.
#[derive(Debug, FromRow)]
struct GrantRow {
    id: GrantId,
    scope: ResourceScope,
    table_id: TableId,
    database_id: DatabaseId,
    column_id: Option<ColumnId>,
    record_id: Option<RecordId>,
    target_type: TargetType,
    target_user_id: Option<UserId>,
    target_role: Option<MemberRole>,
    can_view: bool,
    can_edit: bool,
    name: String,
    note: String,
    is_default: bool,
    created_by: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GrantRow {
    /// Rebuild the typed grant. Rows whose scope or target columns are
    /// inconsistent yield `None`.
    fn into_grant(self) -> Option<PermissionGrant> {
        let resource =
            ResourceRef::from_parts(self.scope, self.table_id, self.column_id, self.record_id)?;
        let target =
            GrantTarget::from_parts(self.target_type, self.target_user_id, self.target_role)?;
        Some(PermissionGrant {
            id: self.id,
            resource,
            table_id: self.table_id,
            database_id: self.database_id,
            target,
            can_view: self.can_view,
            can_edit: self.can_edit,
            name: self.name,
            note: self.note,
            is_default: self.is_default,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Decode rows, skipping malformed ones.
fn decode_rows(rows: Vec<GrantRow>) -> Vec<PermissionGrant> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            let decoded = row.into_grant();
            if decoded.is_none() {
                warn!(grant_id = %id, "Skipping malformed permission grant row");
            }
            decoded
        })
        .collect()
}

fn decode_row(row: GrantRow) -> Option<PermissionGrant> {
    decode_rows(vec![row]).pop()
}

/// Resource bind values in [`RESOURCE_FILTER`] order.
fn resource_binds(
    resource: &ResourceRef,
) -> (ResourceScope, Option<TableId>, Option<ColumnId>, Option<RecordId>) {
    let table_id = match resource {
        ResourceRef::Table { table_id } => Some(*table_id),
        _ => None,
    };
    (
        resource.scope(),
        table_id,
        resource.column_id(),
        resource.record_id(),
    )
}

/// Repository for permission grants at every scope.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GrantStore for GrantRepository {
    async fn insert(&self, grant: NewGrant) -> AppResult<PermissionGrant> {
        let row = sqlx::query_as::<_, GrantRow>(
            "INSERT INTO permission_grants \
             (id, scope, table_id, database_id, column_id, record_id, target_type, \
              target_user_id, target_role, can_view, can_edit, name, note, is_default, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING *",
        )
        .bind(GrantId::new())
        .bind(grant.resource.scope())
        .bind(grant.table_id)
        .bind(grant.database_id)
        .bind(grant.resource.column_id())
        .bind(grant.resource.record_id())
        .bind(grant.target.target_type())
        .bind(grant.target.user_id())
        .bind(grant.target.role())
        .bind(grant.can_view)
        .bind(grant.can_edit)
        .bind(&grant.name)
        .bind(&grant.note)
        .bind(grant.is_default)
        .bind(grant.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::duplicate_grant(format!(
                        "Permission already exists for {} on {}",
                        grant.target, grant.resource
                    ));
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to create permission grant", e)
        })?;

        decode_row(row)
            .ok_or_else(|| AppError::internal("Inserted permission grant could not be decoded"))
    }

    async fn find_by_id(&self, id: GrantId) -> AppResult<Option<PermissionGrant>> {
        let row = sqlx::query_as::<_, GrantRow>("SELECT * FROM permission_grants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission grant", e)
            })?;
        Ok(row.and_then(decode_row))
    }

    async fn find_by_target(
        &self,
        resource: &ResourceRef,
        target: &GrantTarget,
    ) -> AppResult<Option<PermissionGrant>> {
        let (scope, table_id, column_id, record_id) = resource_binds(resource);
        let sql = format!(
            "SELECT * FROM permission_grants WHERE {RESOURCE_FILTER} \
             AND target_type = $5 \
             AND target_user_id IS NOT DISTINCT FROM $6 \
             AND target_role IS NOT DISTINCT FROM $7"
        );
        let row = sqlx::query_as::<_, GrantRow>(&sql)
            .bind(scope)
            .bind(table_id)
            .bind(column_id)
            .bind(record_id)
            .bind(target.target_type())
            .bind(target.user_id())
            .bind(target.role())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission grant", e)
            })?;
        Ok(row.and_then(decode_row))
    }

    async fn list_for_resource(&self, resource: &ResourceRef) -> AppResult<Vec<PermissionGrant>> {
        let (scope, table_id, column_id, record_id) = resource_binds(resource);
        let sql = format!(
            "SELECT * FROM permission_grants WHERE {RESOURCE_FILTER} \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, GrantRow>(&sql)
            .bind(scope)
            .bind(table_id)
            .bind(column_id)
            .bind(record_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list permission grants", e)
            })?;
        Ok(decode_rows(rows))
    }

    async fn list_for_table(
        &self,
        table_id: TableId,
        scope: ResourceScope,
    ) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            "SELECT * FROM permission_grants WHERE table_id = $1 AND scope = $2 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(table_id)
        .bind(scope)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list table grants", e)
        })?;
        Ok(decode_rows(rows))
    }

    async fn update(&self, id: GrantId, patch: &GrantPatch) -> AppResult<PermissionGrant> {
        let row = sqlx::query_as::<_, GrantRow>(
            "UPDATE permission_grants SET \
             name = COALESCE($2, name), \
             can_view = COALESCE($3, can_view), \
             can_edit = COALESCE($4, can_edit), \
             note = COALESCE($5, note), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.can_view)
        .bind(patch.can_edit)
        .bind(patch.note.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update permission grant", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Permission {id} not found")))?;

        decode_row(row)
            .ok_or_else(|| AppError::internal(format!("Permission {id} could not be decoded")))
    }

    async fn delete(&self, id: GrantId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permission_grants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete permission grant", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
