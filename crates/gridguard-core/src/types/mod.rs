//! Shared value types.

pub mod id;

pub use id::{ColumnId, DatabaseId, GrantId, RecordId, TableId, UserId};
