//! Placing a resource inside its table and database.

use gridguard_core::error::AppError;
use gridguard_core::result::AppResult;
use gridguard_core::types::{DatabaseId, TableId};
use gridguard_database::store::ResourceLocator;
use gridguard_entity::grant::ResourceRef;
use gridguard_entity::location::{ColumnInfo, RecordInfo, TableInfo};

/// A resource together with the catalog rows that locate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedResource {
    /// The resource.
    pub resource: ResourceRef,
    /// Containing table.
    pub table: TableInfo,
    /// The column, for column and cell resources.
    pub column: Option<ColumnInfo>,
    /// The record, for record and cell resources.
    pub record: Option<RecordInfo>,
}

impl LocatedResource {
    /// Look up the catalog rows behind `resource`.
    ///
    /// Fails with `ResourceNotFound` for unknown ids and with `Validation`
    /// when a cell's record and column live in different tables.
    pub async fn locate(
        locator: &dyn ResourceLocator,
        resource: ResourceRef,
    ) -> AppResult<Self> {
        let column = match resource.column_id() {
            Some(id) => Some(locator.find_column(id).await?.ok_or_else(|| {
                AppError::resource_not_found(format!("Column {id} not found"))
            })?),
            None => None,
        };
        let record = match resource.record_id() {
            Some(id) => Some(locator.find_record(id).await?.ok_or_else(|| {
                AppError::resource_not_found(format!("Record {id} not found"))
            })?),
            None => None,
        };

        if let (Some(column), Some(record)) = (&column, &record) {
            if column.table_id != record.table_id {
                return Err(AppError::validation(format!(
                    "Record {} and column {} belong to different tables",
                    record.id, column.id
                )));
            }
        }

        let table_id = match resource {
            ResourceRef::Table { table_id } => table_id,
            _ => column
                .as_ref()
                .map(|c| c.table_id)
                .or_else(|| record.as_ref().map(|r| r.table_id))
                .ok_or_else(|| AppError::internal(format!("Resource {resource} has no table")))?,
        };
        let table = locator
            .find_table(table_id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Table {table_id} not found")))?;

        Ok(Self {
            resource,
            table,
            column,
            record,
        })
    }

    /// Containing table id.
    pub fn table_id(&self) -> TableId {
        self.table.id
    }

    /// Containing database id.
    pub fn database_id(&self) -> DatabaseId {
        self.table.database_id
    }

    /// Name given to grants created without one.
    ///
    /// Tables and columns use their own name, records `Record {n}` and
    /// cells `{column} - Record {n}`, `n` being the record's position.
    pub fn default_grant_name(&self) -> String {
        let column_name = self.column.as_ref().map(|c| c.name.as_str());
        let record_label = self.record.as_ref().map(|r| format!("Record {}", r.position));
        match (column_name, record_label) {
            (Some(column), Some(record)) => format!("{column} - {record}"),
            (Some(column), None) => column.to_string(),
            (None, Some(record)) => record,
            (None, None) => self.table.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridguard_core::ErrorKind;
    use gridguard_core::types::{ColumnId, DatabaseId};
    use gridguard_database::store::MemoryCatalog;

    async fn name_of(catalog: &MemoryCatalog, resource: ResourceRef) -> String {
        LocatedResource::locate(catalog, resource)
            .await
            .unwrap()
            .default_grant_name()
    }

    #[tokio::test]
    async fn test_default_names_per_scope() {
        let catalog = MemoryCatalog::new();
        let table = catalog.add_table(DatabaseId::new(), "Orders");
        let price = catalog.add_column(table.id, "Price").unwrap();
        catalog.add_record(table.id).unwrap();
        let second = catalog.add_record(table.id).unwrap();

        assert_eq!(name_of(&catalog, ResourceRef::Table { table_id: table.id }).await, "Orders");
        assert_eq!(name_of(&catalog, ResourceRef::Column { column_id: price.id }).await, "Price");
        assert_eq!(
            name_of(&catalog, ResourceRef::Record {
                record_id: second.id
            })
            .await,
            "Record 2"
        );
        assert_eq!(
            name_of(&catalog, ResourceRef::Cell {
                record_id: second.id,
                column_id: price.id
            })
            .await,
            "Price - Record 2"
        );
    }

    #[tokio::test]
    async fn test_cell_across_tables_is_rejected() {
        let catalog = MemoryCatalog::new();
        let database_id = DatabaseId::new();
        let orders = catalog.add_table(database_id, "Orders");
        let customers = catalog.add_table(database_id, "Customers");
        let column = catalog.add_column(orders.id, "Price").unwrap();
        let record = catalog.add_record(customers.id).unwrap();

        let err = LocatedResource::locate(
            &catalog,
            ResourceRef::Cell {
                record_id: record.id,
                column_id: column.id,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unknown_column_is_resource_not_found() {
        let catalog = MemoryCatalog::new();
        let err = LocatedResource::locate(
            &catalog,
            ResourceRef::Column {
                column_id: ColumnId::new(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ResourceNotFound);
    }
}
