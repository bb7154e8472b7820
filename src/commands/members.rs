//! Database member listing.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use gridguard_core::error::AppError;
use gridguard_core::types::{DatabaseId, UserId};
use gridguard_entity::member::MemberView;
use gridguard_service::GrantService;

use crate::output::{self, OutputFormat};

/// Arguments for the members command
#[derive(Debug, Args)]
pub struct MembersArgs {
    /// User the command acts as (must own or manage the database)
    #[arg(long = "as")]
    pub acting_user: UserId,

    /// Database ID
    #[arg(long)]
    pub database: DatabaseId,
}

/// Member display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MemberRow {
    /// User ID
    id: String,
    /// Name
    name: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Joined at
    joined_at: String,
}

impl From<&MemberView> for MemberRow {
    fn from(m: &MemberView) -> Self {
        Self {
            id: m.user.id.to_string(),
            name: m.user.name.clone(),
            email: m.user.email.clone().unwrap_or_default(),
            role: m.role.to_string(),
            joined_at: m.joined_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute the members command
pub async fn execute(
    args: &MembersArgs,
    service: &GrantService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = service.context_for(args.acting_user).await?;
    let members = service.list_members(&ctx, args.database).await?;
    let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();
    output::print_list(&rows, &members, format);
    Ok(())
}
