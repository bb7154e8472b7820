//! Shared fixtures for integration tests.
//!
//! Builds one database with an owner, a manager, a member, a non-member
//! and a super administrator, plus an `Orders` table with three columns
//! and three records, all over the in-memory stores.

#![allow(dead_code)]

use gridguard_auth::Actor;
use gridguard_core::config::PermissionConfig;
use gridguard_core::result::AppResult;
use gridguard_core::types::{DatabaseId, UserId};
use gridguard_database::{MemoryCatalog, MemoryGrantStore, Stores};
use gridguard_entity::grant::{CreateGrantRequest, GrantView, ResourceRef};
use gridguard_entity::location::{ColumnInfo, RecordInfo, TableInfo};
use gridguard_entity::member::MemberRole;
use gridguard_entity::user::User;
use gridguard_service::{GrantService, RequestContext};

/// Test application context
pub struct TestApp {
    /// Service under test
    pub service: GrantService,
    /// Users, memberships and catalog
    pub catalog: MemoryCatalog,
    /// Grant storage
    pub grants: MemoryGrantStore,
    /// The fixture database
    pub database_id: DatabaseId,
    /// Database owner
    pub owner: User,
    /// Database manager
    pub manager: User,
    /// Plain member
    pub member: User,
    /// Registered user without membership
    pub outsider: User,
    /// Platform super administrator (not a member)
    pub admin: User,
    /// The `Orders` table
    pub table: TableInfo,
    /// `Item`, `Price`, `Qty`
    pub columns: Vec<ColumnInfo>,
    /// Three records, in position order
    pub records: Vec<RecordInfo>,
}

impl TestApp {
    /// Create a fixture with default permission settings
    pub fn new() -> Self {
        Self::with_config(PermissionConfig::default())
    }

    /// Create a fixture with custom permission settings
    pub fn with_config(config: PermissionConfig) -> Self {
        let catalog = MemoryCatalog::new();
        let grants = MemoryGrantStore::new();
        let database_id = DatabaseId::new();

        let owner = catalog.add_user("Olivia Owner", Some("owner@example.com"), false);
        let manager = catalog.add_user("Max Manager", Some("manager@example.com"), false);
        let member = catalog.add_user("Mia Member", Some("member@example.com"), false);
        let outsider = catalog.add_user("Oscar Outsider", None, false);
        let admin = catalog.add_user("Ada Admin", Some("admin@example.com"), true);

        catalog.add_member(owner.id, database_id, MemberRole::Owner);
        catalog.add_member(manager.id, database_id, MemberRole::Manager);
        catalog.add_member(member.id, database_id, MemberRole::Member);

        let table = catalog.add_table(database_id, "Orders");
        let columns = ["Item", "Price", "Qty"]
            .into_iter()
            .map(|name| catalog.add_column(table.id, name).expect("column"))
            .collect();
        let records = (0..3)
            .map(|_| catalog.add_record(table.id).expect("record"))
            .collect();

        let service = GrantService::new(Stores::memory(grants.clone(), catalog.clone()), config);

        Self {
            service,
            catalog,
            grants,
            database_id,
            owner,
            manager,
            member,
            outsider,
            admin,
            table,
            columns,
            records,
        }
    }

    /// Request context for a fixture user
    pub fn ctx(&self, user: &User) -> RequestContext {
        RequestContext::from_user(user)
    }

    /// Actor for a fixture user
    pub fn actor(&self, user: &User) -> Actor {
        Actor::from(user)
    }

    /// The `Orders` table
    pub fn table_ref(&self) -> ResourceRef {
        ResourceRef::Table {
            table_id: self.table.id,
        }
    }

    /// Column `i` of `Orders`
    pub fn column_ref(&self, i: usize) -> ResourceRef {
        ResourceRef::Column {
            column_id: self.columns[i].id,
        }
    }

    /// Record `i` of `Orders`
    pub fn record_ref(&self, i: usize) -> ResourceRef {
        ResourceRef::Record {
            record_id: self.records[i].id,
        }
    }

    /// Cell at record `r`, column `c`
    pub fn cell_ref(&self, r: usize, c: usize) -> ResourceRef {
        ResourceRef::Cell {
            record_id: self.records[r].id,
            column_id: self.columns[c].id,
        }
    }

    /// Create a grant acting as `by`
    pub async fn grant(
        &self,
        by: &User,
        resource: ResourceRef,
        req: CreateGrantRequest,
    ) -> AppResult<GrantView> {
        self.service.create(&self.ctx(by), resource, req).await
    }

    /// Effective `(can_view, can_edit)` of `user` on `resource`
    pub async fn access(&self, user: &User, resource: ResourceRef) -> (bool, bool) {
        let decision = self
            .service
            .effective_access(&self.actor(user), resource)
            .await
            .expect("effective access");
        (decision.can_view, decision.can_edit)
    }
}

/// Grant request for all members
pub fn all_members(can_view: bool, can_edit: bool) -> CreateGrantRequest {
    CreateGrantRequest {
        target_type: "all_members".to_string(),
        can_view: Some(can_view),
        can_edit: Some(can_edit),
        ..Default::default()
    }
}

/// Grant request for one user
pub fn for_user(user_id: UserId, can_view: bool, can_edit: bool) -> CreateGrantRequest {
    CreateGrantRequest {
        target_type: "specific_user".to_string(),
        user_id: Some(user_id),
        can_view: Some(can_view),
        can_edit: Some(can_edit),
        ..Default::default()
    }
}

/// Grant request for one role
pub fn for_role(role: &str, can_view: bool, can_edit: bool) -> CreateGrantRequest {
    CreateGrantRequest {
        target_type: "specific_role".to_string(),
        role: Some(role.to_string()),
        can_view: Some(can_view),
        can_edit: Some(can_edit),
        ..Default::default()
    }
}
