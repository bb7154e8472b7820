//! CLI command definitions and dispatch.

pub mod check;
pub mod grant;
pub mod members;
pub mod migrate;

use clap::{Args, Parser, Subcommand};

use gridguard_core::config::AppConfig;
use gridguard_core::error::AppError;
use gridguard_core::types::{ColumnId, RecordId, TableId};
use gridguard_database::DatabasePool;
use gridguard_entity::grant::ResourceRef;
use gridguard_service::GrantService;

use crate::output::OutputFormat;

/// GridGuard: view/edit permissions for tables, columns, records and cells
#[derive(Debug, Parser)]
#[command(name = "gridguard", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Grant management
    Grant(grant::GrantArgs),
    /// Show a user's effective access on a resource
    Check(check::CheckArgs),
    /// List the members of a database
    Members(members::MembersArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let pool = DatabasePool::connect(&config.database).await?;

        let result = match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &pool).await,
            Commands::Grant(args) => {
                grant::execute(args, &grant_service(&pool, &config), self.format).await
            }
            Commands::Check(args) => {
                check::execute(args, &grant_service(&pool, &config), self.format).await
            }
            Commands::Members(args) => {
                members::execute(args, &grant_service(&pool, &config), self.format).await
            }
        };

        pool.close().await;
        result
    }
}

/// Resource selection shared by grant and check commands.
///
/// `--column` with `--record` selects a cell; `--table` alone selects the
/// table.
#[derive(Debug, Clone, Args)]
pub struct ResourceArgs {
    /// Table ID
    #[arg(long)]
    pub table: Option<TableId>,
    /// Column ID
    #[arg(long)]
    pub column: Option<ColumnId>,
    /// Record ID
    #[arg(long)]
    pub record: Option<RecordId>,
}

impl ResourceArgs {
    /// The selected resource.
    pub fn resource(&self) -> Result<ResourceRef, AppError> {
        match (self.table, self.column, self.record) {
            (_, Some(column_id), Some(record_id)) => Ok(ResourceRef::Cell {
                record_id,
                column_id,
            }),
            (_, Some(column_id), None) => Ok(ResourceRef::Column { column_id }),
            (_, None, Some(record_id)) => Ok(ResourceRef::Record { record_id }),
            (Some(table_id), None, None) => Ok(ResourceRef::Table { table_id }),
            (None, None, None) => Err(AppError::validation(
                "Select a resource with --table, --column and/or --record",
            )),
        }
    }
}

/// Helper: build the grant service over PostgreSQL
fn grant_service(pool: &DatabasePool, config: &AppConfig) -> GrantService {
    GrantService::new(pool.stores(), config.permissions.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridguard_core::ErrorKind;

    #[test]
    fn test_resource_selection() {
        let column_id = ColumnId::new();
        let record_id = RecordId::new();
        let args = ResourceArgs {
            table: Some(TableId::new()),
            column: Some(column_id),
            record: Some(record_id),
        };
        assert_eq!(
            args.resource().unwrap(),
            ResourceRef::Cell {
                record_id,
                column_id
            }
        );

        let empty = ResourceArgs {
            table: None,
            column: None,
            record: None,
        };
        assert_eq!(empty.resource().unwrap_err().kind, ErrorKind::Validation);
    }

    #[test]
    fn test_cli_parses_grant_create() {
        let cli = Cli::try_parse_from([
            "gridguard",
            "--format",
            "json",
            "grant",
            "create",
            "--as",
            "5f0c7c1e-8d3a-4b59-9d0e-2b9f6a1c0e11",
            "--table",
            "7a1f2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d",
            "--target",
            "specific_role",
            "--role",
            "member",
            "--edit",
            "false",
        ])
        .expect("arguments should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Grant(_)));
    }
}
