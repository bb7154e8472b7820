//! In-memory stores for tests and single-process embedding.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;

use gridguard_core::error::AppError;
use gridguard_core::result::AppResult;
use gridguard_core::types::{ColumnId, DatabaseId, GrantId, RecordId, TableId, UserId};
use gridguard_entity::grant::{
    GrantPatch, GrantTarget, NewGrant, PermissionGrant, ResourceRef, ResourceScope,
};
use gridguard_entity::location::{ColumnInfo, RecordInfo, TableInfo};
use gridguard_entity::member::{MemberRole, Membership};
use gridguard_entity::user::{User, UserSummary};

use super::{GrantStore, MembershipStore, ResourceLocator, UserDirectory};

/// Grant storage guarded by a single lock.
#[derive(Debug, Default)]
struct GrantState {
    /// Grants by id.
    grants: HashMap<GrantId, PermissionGrant>,
    /// Uniqueness index on (resource, target).
    by_target: HashMap<(ResourceRef, GrantTarget), GrantId>,
    /// Insertion order, used to break `created_at` ties.
    order: Vec<GrantId>,
}

impl GrantState {
    /// Grants matching `keep`, newest first.
    ///
    /// Scans and sorts the whole store on every call.
    fn collect_newest_first(
        &self,
        keep: impl Fn(&PermissionGrant) -> bool,
    ) -> Vec<PermissionGrant> {
        let mut out: Vec<PermissionGrant> = self
            .order
            .iter()
            .rev()
            .filter_map(|id| self.grants.get(id))
            .filter(|g| keep(*g))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

/// In-memory [`GrantStore`].
///
/// The uniqueness check and insert happen under one write lock, which
/// gives the same atomicity as the PostgreSQL unique constraint.
///
/// Listings scan every stored grant and deletes are linear in the number
/// of grants. Meant for tests and small embedded catalogs, not large
/// grant sets; use [`crate::repositories::GrantRepository`] for those.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrantStore {
    state: Arc<RwLock<GrantState>>,
}

impl MemoryGrantStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored grants.
    pub async fn len(&self) -> usize {
        self.state.read().await.grants.len()
    }

    /// Whether the store holds no grants.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn insert(&self, grant: NewGrant) -> AppResult<PermissionGrant> {
        let mut state = self.state.write().await;

        let key = grant.unique_key();
        if state.by_target.contains_key(&key) {
            return Err(AppError::duplicate_grant(format!(
                "Permission already exists for {} on {}",
                key.1, key.0
            )));
        }

        let grant = grant.into_grant(Utc::now());
        state.by_target.insert(key, grant.id);
        state.order.push(grant.id);
        state.grants.insert(grant.id, grant.clone());

        debug!(grant_id = %grant.id, resource = %grant.resource, "Grant stored in memory");
        Ok(grant)
    }

    async fn find_by_id(&self, id: GrantId) -> AppResult<Option<PermissionGrant>> {
        Ok(self.state.read().await.grants.get(&id).cloned())
    }

    async fn find_by_target(
        &self,
        resource: &ResourceRef,
        target: &GrantTarget,
    ) -> AppResult<Option<PermissionGrant>> {
        let state = self.state.read().await;
        Ok(state
            .by_target
            .get(&(*resource, *target))
            .and_then(|id| state.grants.get(id))
            .cloned())
    }

    async fn list_for_resource(&self, resource: &ResourceRef) -> AppResult<Vec<PermissionGrant>> {
        let state = self.state.read().await;
        Ok(state.collect_newest_first(|g| g.resource == *resource))
    }

    async fn list_for_table(
        &self,
        table_id: TableId,
        scope: ResourceScope,
    ) -> AppResult<Vec<PermissionGrant>> {
        let state = self.state.read().await;
        Ok(state.collect_newest_first(|g| g.table_id == table_id && g.resource.scope() == scope))
    }

    async fn update(&self, id: GrantId, patch: &GrantPatch) -> AppResult<PermissionGrant> {
        let mut state = self.state.write().await;
        let grant = state
            .grants
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Permission {id} not found")))?;
        patch.apply(grant, Utc::now());
        Ok(grant.clone())
    }

    async fn delete(&self, id: GrantId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.grants.remove(&id) {
            Some(grant) => {
                state.by_target.remove(&grant.unique_key());
                state.order.retain(|g| *g != id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory users, memberships and data catalog.
///
/// Implements [`MembershipStore`], [`UserDirectory`] and
/// [`ResourceLocator`] so tests can stand up a whole tenant in a few calls.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    users: Arc<DashMap<UserId, User>>,
    members: Arc<DashMap<(UserId, DatabaseId), Membership>>,
    tables: Arc<DashMap<TableId, TableInfo>>,
    columns: Arc<DashMap<ColumnId, ColumnInfo>>,
    records: Arc<DashMap<RecordId, RecordInfo>>,
    column_order: Arc<DashMap<TableId, Vec<ColumnId>>>,
    record_counts: Arc<DashMap<TableId, i64>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub fn add_user(&self, name: &str, email: Option<&str>, is_super_admin: bool) -> User {
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email: email.map(str::to_string),
            is_super_admin,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        user
    }

    /// Adds or replaces a membership.
    pub fn add_member(
        &self,
        user_id: UserId,
        database_id: DatabaseId,
        role: MemberRole,
    ) -> Membership {
        let membership = Membership {
            user_id,
            database_id,
            role,
            created_at: Utc::now(),
        };
        self.members
            .insert((user_id, database_id), membership.clone());
        membership
    }

    /// Removes a membership. Returns `true` if it existed.
    pub fn remove_member(&self, user_id: UserId, database_id: DatabaseId) -> bool {
        self.members.remove(&(user_id, database_id)).is_some()
    }

    /// Registers a table.
    pub fn add_table(&self, database_id: DatabaseId, name: &str) -> TableInfo {
        let table = TableInfo {
            id: TableId::new(),
            database_id,
            name: name.to_string(),
        };
        self.tables.insert(table.id, table.clone());
        table
    }

    /// Registers a column on an existing table.
    pub fn add_column(&self, table_id: TableId, name: &str) -> AppResult<ColumnInfo> {
        let table = self
            .tables
            .get(&table_id)
            .ok_or_else(|| AppError::resource_not_found(format!("Table {table_id} not found")))?;
        let column = ColumnInfo {
            id: ColumnId::new(),
            table_id,
            database_id: table.database_id,
            name: name.to_string(),
        };
        self.columns.insert(column.id, column.clone());
        self.column_order
            .entry(table_id)
            .or_default()
            .push(column.id);
        Ok(column)
    }

    /// Appends a record to an existing table.
    pub fn add_record(&self, table_id: TableId) -> AppResult<RecordInfo> {
        let database_id = self
            .tables
            .get(&table_id)
            .map(|t| t.database_id)
            .ok_or_else(|| AppError::resource_not_found(format!("Table {table_id} not found")))?;

        let position = {
            let mut count = self.record_counts.entry(table_id).or_insert(0);
            *count += 1;
            *count
        };

        let record = RecordInfo {
            id: RecordId::new(),
            table_id,
            database_id,
            position,
        };
        self.records.insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl MembershipStore for MemoryCatalog {
    async fn find_membership(
        &self,
        user_id: UserId,
        database_id: DatabaseId,
    ) -> AppResult<Option<Membership>> {
        Ok(self
            .members
            .get(&(user_id, database_id))
            .map(|m| m.value().clone()))
    }

    async fn list_members(&self, database_id: DatabaseId) -> AppResult<Vec<Membership>> {
        let mut members: Vec<Membership> = self
            .members
            .iter()
            .filter(|m| m.database_id == database_id)
            .map(|m| m.value().clone())
            .collect();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(members)
    }
}

#[async_trait]
impl UserDirectory for MemoryCatalog {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_summaries(&self, ids: &[UserId]) -> AppResult<Vec<UserSummary>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.summary()))
            .collect())
    }
}

#[async_trait]
impl ResourceLocator for MemoryCatalog {
    async fn find_table(&self, id: TableId) -> AppResult<Option<TableInfo>> {
        Ok(self.tables.get(&id).map(|t| t.value().clone()))
    }

    async fn find_column(&self, id: ColumnId) -> AppResult<Option<ColumnInfo>> {
        Ok(self.columns.get(&id).map(|c| c.value().clone()))
    }

    async fn find_record(&self, id: RecordId) -> AppResult<Option<RecordInfo>> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }

    async fn list_columns(&self, table_id: TableId) -> AppResult<Vec<ColumnInfo>> {
        let ids = self
            .column_order
            .get(&table_id)
            .map(|ids| ids.value().clone())
            .unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| self.columns.get(id).map(|c| c.value().clone()))
            .collect())
    }

    async fn list_records(&self, table_id: TableId) -> AppResult<Vec<RecordInfo>> {
        let mut records: Vec<RecordInfo> = self
            .records
            .iter()
            .filter(|r| r.table_id == table_id)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.position);
        Ok(records)
    }
}
