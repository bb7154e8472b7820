//! Grant management commands.

use clap::{ArgAction, Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gridguard_core::error::AppError;
use gridguard_core::types::{GrantId, TableId, UserId};
use gridguard_entity::grant::{CreateGrantRequest, GrantPatch, GrantView, ResourceScope};
use gridguard_service::GrantService;

use super::ResourceArgs;
use crate::output::{self, OutputFormat};

/// Arguments for grant commands
#[derive(Debug, Args)]
pub struct GrantArgs {
    /// Grant subcommand
    #[command(subcommand)]
    pub command: GrantCommand,
}

/// Grant subcommands
#[derive(Debug, Subcommand)]
pub enum GrantCommand {
    /// List the grants on a resource
    List {
        /// User the command acts as
        #[arg(long = "as")]
        acting_user: UserId,
        /// Resource
        #[command(flatten)]
        resource: ResourceArgs,
    },
    /// List every grant of one scope under a table
    Table {
        /// User the command acts as
        #[arg(long = "as")]
        acting_user: UserId,
        /// Table ID
        #[arg(long)]
        table: TableId,
        /// Scope: table, column, record or cell
        #[arg(long, default_value = "column")]
        scope: ResourceScope,
    },
    /// Create a grant
    Create {
        /// User the command acts as
        #[arg(long = "as")]
        acting_user: UserId,
        /// Resource
        #[command(flatten)]
        resource: ResourceArgs,
        /// Target type: all_members, specific_user or specific_role
        #[arg(long, default_value = "all_members")]
        target: String,
        /// Targeted user (specific_user)
        #[arg(long)]
        user: Option<UserId>,
        /// Targeted role (specific_role)
        #[arg(long)]
        role: Option<String>,
        /// View flag
        #[arg(long, action = ArgAction::Set)]
        view: Option<bool>,
        /// Edit flag
        #[arg(long, action = ArgAction::Set)]
        edit: Option<bool>,
        /// Display name (derived from the resource when omitted)
        #[arg(long)]
        name: Option<String>,
        /// Note
        #[arg(long)]
        note: Option<String>,
    },
    /// Update a grant
    Update {
        /// User the command acts as
        #[arg(long = "as")]
        acting_user: UserId,
        /// Grant ID
        id: GrantId,
        /// New view flag
        #[arg(long, action = ArgAction::Set)]
        view: Option<bool>,
        /// New edit flag
        #[arg(long, action = ArgAction::Set)]
        edit: Option<bool>,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a grant
    Delete {
        /// User the command acts as
        #[arg(long = "as")]
        acting_user: UserId,
        /// Grant ID
        id: GrantId,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Seed the protected all-members grant on a resource
    Seed {
        /// Resource
        #[command(flatten)]
        resource: ResourceArgs,
    },
}

/// Grant display row for table output
#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    /// Grant ID
    id: String,
    /// Name
    name: String,
    /// Resource
    resource: String,
    /// Target
    target: String,
    /// View
    view: bool,
    /// Edit
    edit: bool,
    /// Default
    default: bool,
    /// Created by
    created_by: String,
}

impl From<&GrantView> for GrantRow {
    fn from(v: &GrantView) -> Self {
        let target = match &v.target_user {
            Some(user) => format!("{} ({})", v.grant.target, user.name),
            None => v.grant.target.to_string(),
        };
        Self {
            id: v.grant.id.to_string(),
            name: v.grant.name.clone(),
            resource: v.grant.resource.to_string(),
            target,
            view: v.grant.can_view,
            edit: v.grant.can_edit,
            default: v.grant.is_default,
            created_by: v
                .creator
                .as_ref()
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "system".to_string()),
        }
    }
}

fn print_grants(grants: &[GrantView], format: OutputFormat) {
    let rows: Vec<GrantRow> = grants.iter().map(GrantRow::from).collect();
    output::print_list(&rows, grants, format);
}

/// Execute grant commands
pub async fn execute(
    args: &GrantArgs,
    service: &GrantService,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        GrantCommand::List {
            acting_user,
            resource,
        } => {
            let ctx = service.context_for(*acting_user).await?;
            let grants = service.list(&ctx, resource.resource()?).await?;
            print_grants(&grants, format);
        }
        GrantCommand::Table {
            acting_user,
            table,
            scope,
        } => {
            let ctx = service.context_for(*acting_user).await?;
            let grants = service.list_for_table(&ctx, *table, *scope).await?;
            print_grants(&grants, format);
        }
        GrantCommand::Create {
            acting_user,
            resource,
            target,
            user,
            role,
            view,
            edit,
            name,
            note,
        } => {
            let ctx = service.context_for(*acting_user).await?;
            let req = CreateGrantRequest {
                target_type: target.clone(),
                user_id: *user,
                role: role.clone(),
                can_view: *view,
                can_edit: *edit,
                name: name.clone(),
                note: note.clone(),
            };
            let created = service.create(&ctx, resource.resource()?, req).await?;
            output::print_success(&format!("Grant '{}' created", created.grant.name));
            print_grants(std::slice::from_ref(&created), format);
        }
        GrantCommand::Update {
            acting_user,
            id,
            view,
            edit,
            name,
            note,
        } => {
            let ctx = service.context_for(*acting_user).await?;
            let patch = GrantPatch {
                name: name.clone(),
                can_view: *view,
                can_edit: *edit,
                note: note.clone(),
            };
            let updated = service.update(&ctx, *id, patch).await?;
            output::print_success(&format!("Grant '{}' updated", updated.grant.name));
            print_grants(std::slice::from_ref(&updated), format);
        }
        GrantCommand::Delete {
            acting_user,
            id,
            force,
        } => {
            let ctx = service.context_for(*acting_user).await?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete grant {id}?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            service.delete(&ctx, *id).await?;
            output::print_success(&format!("Grant {id} deleted"));
        }
        GrantCommand::Seed { resource } => {
            match service.seed_default(resource.resource()?, None).await? {
                Some(grant) => {
                    output::print_success(&format!("Default grant '{}' in place", grant.name));
                    output::print_kv("id", &grant.id.to_string());
                }
                None => println!("Default grant seeding is disabled."),
            }
        }
    }

    Ok(())
}
