//! Effective access inspection.

use clap::Args;

use gridguard_core::error::AppError;
use gridguard_core::types::UserId;
use gridguard_service::GrantService;

use super::ResourceArgs;
use crate::output::{self, OutputFormat};

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// User whose access is resolved
    #[arg(long)]
    pub user: UserId,

    /// Resource to resolve
    #[command(flatten)]
    pub resource: ResourceArgs,
}

/// Execute the check command
pub async fn execute(
    args: &CheckArgs,
    service: &GrantService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let resource = args.resource.resource()?;
    let actor = service.context_for(args.user).await?.actor();
    let decision = service.effective_access(&actor, resource).await?;

    output::print_item(
        &[
            ("resource", resource.to_string()),
            ("user", args.user.to_string()),
            ("can_view", decision.can_view.to_string()),
            ("can_edit", decision.can_edit.to_string()),
            ("source", format!("{:?}", decision.source)),
        ],
        &decision,
        format,
    );
    Ok(())
}
