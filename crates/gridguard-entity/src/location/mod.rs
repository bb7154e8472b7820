//! Resource location records supplied by the data catalog.

pub mod model;

pub use model::{ColumnInfo, RecordInfo, TableInfo};
