//! Resource scopes a grant can be attached to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use gridguard_core::types::{ColumnId, RecordId, TableId};

/// Granularity level of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_scope", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceScope {
    /// A whole table.
    Table,
    /// One column of a table.
    Column,
    /// One record of a table.
    Record,
    /// One cell, addressed by record and column.
    Cell,
}

impl ResourceScope {
    /// Return the scope as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Record => "record",
            Self::Cell => "cell",
        }
    }
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceScope {
    type Err = gridguard_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "tables" => Ok(Self::Table),
            "column" | "columns" => Ok(Self::Column),
            "record" | "records" => Ok(Self::Record),
            "cell" | "cells" => Ok(Self::Cell),
            _ => Err(gridguard_core::AppError::validation(format!(
                "Invalid resource scope: '{s}'"
            ))),
        }
    }
}

/// Identifies the resource a grant is attached to.
///
/// Cells carry both their record and column; every other scope is a
/// single identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum ResourceRef {
    /// A table.
    Table {
        /// Table identifier.
        table_id: TableId,
    },
    /// A column.
    Column {
        /// Column identifier.
        column_id: ColumnId,
    },
    /// A record.
    Record {
        /// Record identifier.
        record_id: RecordId,
    },
    /// A cell.
    Cell {
        /// Record holding the cell.
        record_id: RecordId,
        /// Column holding the cell.
        column_id: ColumnId,
    },
}

impl ResourceRef {
    /// The granularity of this resource.
    pub fn scope(&self) -> ResourceScope {
        match self {
            Self::Table { .. } => ResourceScope::Table,
            Self::Column { .. } => ResourceScope::Column,
            Self::Record { .. } => ResourceScope::Record,
            Self::Cell { .. } => ResourceScope::Cell,
        }
    }

    /// The column component, for column and cell resources.
    pub fn column_id(&self) -> Option<ColumnId> {
        match self {
            Self::Column { column_id } | Self::Cell { column_id, .. } => Some(*column_id),
            Self::Table { .. } | Self::Record { .. } => None,
        }
    }

    /// The record component, for record and cell resources.
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::Record { record_id } | Self::Cell { record_id, .. } => Some(*record_id),
            Self::Table { .. } | Self::Column { .. } => None,
        }
    }

    /// Rebuild a resource reference from its stored columns.
    ///
    /// Returns `None` when the columns required by `scope` are missing.
    pub fn from_parts(
        scope: ResourceScope,
        table_id: TableId,
        column_id: Option<ColumnId>,
        record_id: Option<RecordId>,
    ) -> Option<Self> {
        match scope {
            ResourceScope::Table => Some(Self::Table { table_id }),
            ResourceScope::Column => column_id.map(|column_id| Self::Column { column_id }),
            ResourceScope::Record => record_id.map(|record_id| Self::Record { record_id }),
            ResourceScope::Cell => match (record_id, column_id) {
                (Some(record_id), Some(column_id)) => Some(Self::Cell {
                    record_id,
                    column_id,
                }),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { table_id } => write!(f, "table:{table_id}"),
            Self::Column { column_id } => write!(f, "column:{column_id}"),
            Self::Record { record_id } => write!(f, "record:{record_id}"),
            Self::Cell {
                record_id,
                column_id,
            } => write!(f, "cell:{record_id}:{column_id}"),
        }
    }
}
