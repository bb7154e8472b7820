//! Data catalog lookups: tables, columns and records.

use async_trait::async_trait;
use sqlx::PgPool;

use gridguard_core::error::{AppError, ErrorKind};
use gridguard_core::result::AppResult;
use gridguard_core::types::{ColumnId, RecordId, TableId};
use gridguard_entity::location::{ColumnInfo, RecordInfo, TableInfo};

use crate::store::ResourceLocator;

/// Read-only repository over the data catalog tables.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceLocator for CatalogRepository {
    async fn find_table(&self, id: TableId) -> AppResult<Option<TableInfo>> {
        sqlx::query_as::<_, TableInfo>(
            "SELECT id, database_id, name FROM data_tables WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find table", e))
    }

    async fn find_column(&self, id: ColumnId) -> AppResult<Option<ColumnInfo>> {
        sqlx::query_as::<_, ColumnInfo>(
            "SELECT c.id, c.table_id, t.database_id, c.name FROM data_columns c \
             INNER JOIN data_tables t ON t.id = c.table_id WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find column", e))
    }

    async fn find_record(&self, id: RecordId) -> AppResult<Option<RecordInfo>> {
        // Position is the 1-based rank of the record in creation order.
        sqlx::query_as::<_, RecordInfo>(
            "SELECT r.id, r.table_id, t.database_id, \
             (SELECT COUNT(*) FROM data_records p WHERE p.table_id = r.table_id \
              AND (p.created_at, p.id) <= (r.created_at, r.id)) AS position \
             FROM data_records r INNER JOIN data_tables t ON t.id = r.table_id \
             WHERE r.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find record", e))
    }

    async fn list_columns(&self, table_id: TableId) -> AppResult<Vec<ColumnInfo>> {
        sqlx::query_as::<_, ColumnInfo>(
            "SELECT c.id, c.table_id, t.database_id, c.name FROM data_columns c \
             INNER JOIN data_tables t ON t.id = c.table_id \
             WHERE c.table_id = $1 ORDER BY c.created_at, c.id",
        )
        .bind(table_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list columns", e))
    }

    async fn list_records(&self, table_id: TableId) -> AppResult<Vec<RecordInfo>> {
        sqlx::query_as::<_, RecordInfo>(
            "SELECT r.id, r.table_id, t.database_id, \
             ROW_NUMBER() OVER (ORDER BY r.created_at, r.id) AS position \
             FROM data_records r INNER JOIN data_tables t ON t.id = r.table_id \
             WHERE r.table_id = $1 ORDER BY position",
        )
        .bind(table_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list records", e))
    }
}
