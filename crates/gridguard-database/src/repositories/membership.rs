//! Database membership repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use gridguard_core::error::{AppError, ErrorKind};
use gridguard_core::result::AppResult;
use gridguard_core::types::{DatabaseId, UserId};
use gridguard_entity::member::Membership;

use crate::store::MembershipStore;

/// Repository for `database_members`.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn find_membership(
        &self,
        user_id: UserId,
        database_id: DatabaseId,
    ) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT user_id, database_id, role, created_at FROM database_members \
             WHERE user_id = $1 AND database_id = $2",
        )
        .bind(user_id)
        .bind(database_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    async fn list_members(&self, database_id: DatabaseId) -> AppResult<Vec<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT user_id, database_id, role, created_at FROM database_members \
             WHERE database_id = $1 ORDER BY created_at DESC",
        )
        .bind(database_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }
}
