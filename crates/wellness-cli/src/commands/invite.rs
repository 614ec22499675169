//! Invite code commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wellness_core::config::AppConfig;
use wellness_core::error::AppError;
use wellness_core::types::pagination::PageRequest;
use wellness_entity::invite::Invite;
use wellness_entity::user::AppRole;
use wellness_service::invite::CreateInviteRequest;

use crate::output::{self, OutputFormat};

/// Arguments for invite commands
#[derive(Debug, Args)]
pub struct InviteArgs {
    #[command(subcommand)]
    pub command: InviteCommand,
}

/// Invite subcommands
#[derive(Debug, Subcommand)]
pub enum InviteCommand {
    /// Issue an invite code for a company
    Create {
        /// Company ID
        company_id: Uuid,
        /// Intended recipient
        #[arg(long)]
        email: Option<String>,
        /// Role granted on redemption (user or hr)
        #[arg(long)]
        role: Option<AppRole>,
        /// Sessions for the new membership
        #[arg(long)]
        sessions: Option<i32>,
        /// Days until expiry, 0 for never
        #[arg(long)]
        expires_in_days: Option<u32>,
    },
    /// List a company's invites
    List {
        /// Company ID
        company_id: Uuid,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Revoke a pending invite
    Revoke {
        /// Invite ID
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct InviteRow {
    id: String,
    code: String,
    email: String,
    role: String,
    sessions: i32,
    status: String,
    expires_at: String,
}

impl From<&Invite> for InviteRow {
    fn from(i: &Invite) -> Self {
        Self {
            id: i.id.to_string(),
            code: i.code.clone(),
            email: i.email.clone().unwrap_or_else(|| "-".to_string()),
            role: i.role.to_string(),
            sessions: i.sessions_allocated,
            status: i.status.to_string(),
            expires_at: i
                .expires_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Execute invite commands
pub async fn execute(
    args: &InviteArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::build_state(config).await?;
    let ctx = super::operator_context();
    let service = &state.invite_service;

    match &args.command {
        InviteCommand::Create {
            company_id,
            email,
            role,
            sessions,
            expires_in_days,
        } => {
            let invite = service
                .create_invite(
                    &ctx,
                    CreateInviteRequest {
                        company_id: *company_id,
                        email: email.clone(),
                        role: *role,
                        sessions_allocated: *sessions,
                        expires_in_days: *expires_in_days,
                    },
                )
                .await?;
            output::print_success(&format!("Invite code: {}", invite.code));
            output::print_list(&[InviteRow::from(&invite)], format);
        }
        InviteCommand::List {
            company_id,
            page,
            per_page,
        } => {
            let result = service
                .list_invites(&ctx, *company_id, PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<InviteRow> = result.items.iter().map(InviteRow::from).collect();
            output::print_list(&rows, format);
        }
        InviteCommand::Revoke { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Revoke invite {id}? The code can no longer be redeemed."))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let invite = service.revoke_invite(&ctx, *id).await?;
            output::print_success(&format!("Invite {} revoked", invite.code));
        }
    }

    Ok(())
}
