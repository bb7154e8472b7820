//! Store traits consumed by the permission engine.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory implementation in [`memory`].

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use gridguard_core::result::AppResult;
use gridguard_core::types::{ColumnId, DatabaseId, GrantId, RecordId, TableId, UserId};
use gridguard_entity::grant::{
    GrantPatch, GrantTarget, NewGrant, PermissionGrant, ResourceRef, ResourceScope,
};
use gridguard_entity::location::{ColumnInfo, RecordInfo, TableInfo};
use gridguard_entity::member::Membership;
use gridguard_entity::user::{User, UserSummary};

pub use memory::{MemoryCatalog, MemoryGrantStore};

use crate::repositories::{
    CatalogRepository, GrantRepository, MembershipRepository, UserRepository,
};

/// Persistence for permission grants at every resource scope.
#[async_trait]
pub trait GrantStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a grant.
    ///
    /// The duplicate check and the insert are atomic: a grant whose
    /// (resource, target) already exists fails with `DuplicateGrant`.
    async fn insert(&self, grant: NewGrant) -> AppResult<PermissionGrant>;

    /// Find a grant by id.
    async fn find_by_id(&self, id: GrantId) -> AppResult<Option<PermissionGrant>>;

    /// Find the grant for a resource and target, if any.
    async fn find_by_target(
        &self,
        resource: &ResourceRef,
        target: &GrantTarget,
    ) -> AppResult<Option<PermissionGrant>>;

    /// All grants attached to a resource, newest first.
    async fn list_for_resource(&self, resource: &ResourceRef) -> AppResult<Vec<PermissionGrant>>;

    /// All grants of one scope under a table, newest first.
    async fn list_for_table(
        &self,
        table_id: TableId,
        scope: ResourceScope,
    ) -> AppResult<Vec<PermissionGrant>>;

    /// Apply a patch to a grant. Fails with `NotFound` for unknown ids.
    async fn update(&self, id: GrantId, patch: &GrantPatch) -> AppResult<PermissionGrant>;

    /// Delete a grant. Returns `true` if it existed.
    async fn delete(&self, id: GrantId) -> AppResult<bool>;
}

/// Membership lookups backing the role resolver.
#[async_trait]
pub trait MembershipStore: Send + Sync + std::fmt::Debug + 'static {
    /// The membership of a user in a database, if any.
    async fn find_membership(
        &self,
        user_id: UserId,
        database_id: DatabaseId,
    ) -> AppResult<Option<Membership>>;

    /// All memberships of a database.
    async fn list_members(&self, database_id: DatabaseId) -> AppResult<Vec<Membership>>;
}

/// User existence and display lookups.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by id.
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    /// Display data for a set of users; unknown ids are skipped.
    async fn find_summaries(&self, ids: &[UserId]) -> AppResult<Vec<UserSummary>>;
}

/// Places resources inside their table and database.
#[async_trait]
pub trait ResourceLocator: Send + Sync + std::fmt::Debug + 'static {
    /// Locate a table.
    async fn find_table(&self, id: TableId) -> AppResult<Option<TableInfo>>;

    /// Locate a column.
    async fn find_column(&self, id: ColumnId) -> AppResult<Option<ColumnInfo>>;

    /// Locate a record.
    async fn find_record(&self, id: RecordId) -> AppResult<Option<RecordInfo>>;

    /// Columns of a table in creation order.
    async fn list_columns(&self, table_id: TableId) -> AppResult<Vec<ColumnInfo>>;

    /// Records of a table in position order.
    async fn list_records(&self, table_id: TableId) -> AppResult<Vec<RecordInfo>>;
}

/// The full set of stores the grant service runs on.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Grant persistence.
    pub grants: Arc<dyn GrantStore>,
    /// Membership lookups.
    pub members: Arc<dyn MembershipStore>,
    /// User lookups.
    pub users: Arc<dyn UserDirectory>,
    /// Resource location lookups.
    pub locator: Arc<dyn ResourceLocator>,
}

impl Stores {
    /// PostgreSQL repositories over one pool.
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            grants: Arc::new(GrantRepository::new(pool.clone())),
            members: Arc::new(MembershipRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            locator: Arc::new(CatalogRepository::new(pool.clone())),
        }
    }

    /// In-memory stores; the catalog serves members, users and locations.
    pub fn memory(grants: MemoryGrantStore, catalog: MemoryCatalog) -> Self {
        Self {
            grants: Arc::new(grants),
            members: Arc::new(catalog.clone()),
            users: Arc::new(catalog.clone()),
            locator: Arc::new(catalog),
        }
    }
}
