//! Catalog rows used to place a resource inside its table and database.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gridguard_core::types::{ColumnId, DatabaseId, RecordId, TableId};

/// Location and display name of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TableInfo {
    /// Table identifier.
    pub id: TableId,
    /// Owning database.
    pub database_id: DatabaseId,
    /// Table name.
    pub name: String,
}

/// Location and display name of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ColumnInfo {
    /// Column identifier.
    pub id: ColumnId,
    /// Owning table.
    pub table_id: TableId,
    /// Owning database.
    pub database_id: DatabaseId,
    /// Column name.
    pub name: String,
}

/// Location of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecordInfo {
    /// Record identifier.
    pub id: RecordId,
    /// Owning table.
    pub table_id: TableId,
    /// Owning database.
    pub database_id: DatabaseId,
    /// 1-based position of the record in its table, by creation order.
    pub position: i64,
}
