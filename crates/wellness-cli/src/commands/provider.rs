//! Provider commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wellness_core::config::AppConfig;
use wellness_core::error::AppError;
use wellness_core::types::pagination::PageRequest;
use wellness_entity::Pillar;
use wellness_service::provider::CreateProviderRequest;

use crate::output::{self, OutputFormat};

/// Arguments for provider commands
#[derive(Debug, Args)]
pub struct ProviderArgs {
    #[command(subcommand)]
    pub command: ProviderCommand,
}

/// Provider subcommands
#[derive(Debug, Subcommand)]
pub enum ProviderCommand {
    /// Register a provider
    Create {
        /// Display name
        name: String,
        /// Contact e-mail
        email: String,
        /// Pillars served, e.g. `--pillar mental_health --pillar legal`
        #[arg(long = "pillar")]
        pillars: Vec<Pillar>,
        /// Linked login account
        #[arg(long)]
        user_id: Option<Uuid>,
    },
    /// List providers with their assignment counters
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Approve a provider
    Approve {
        /// Provider ID
        id: Uuid,
    },
    /// Add a pillar to a provider
    Attach {
        /// Provider ID
        id: Uuid,
        /// Pillar to serve
        pillar: Pillar,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct ProviderRow {
    id: String,
    name: String,
    email: String,
    active: bool,
    approved: bool,
    /// `pillar=count` pairs.
    assignments: String,
}

/// Execute provider commands
pub async fn execute(
    args: &ProviderArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::build_state(config).await?;
    let ctx = super::operator_context();
    let service = &state.provider_service;

    match &args.command {
        ProviderCommand::Create {
            name,
            email,
            pillars,
            user_id,
        } => {
            let provider = service
                .create_provider(
                    &ctx,
                    CreateProviderRequest {
                        name: name.clone(),
                        email: email.clone(),
                        user_id: *user_id,
                        pillars: pillars.clone(),
                    },
                )
                .await?;
            output::print_success(&format!(
                "Provider '{}' created with {} pillars",
                provider.provider.name,
                provider.pillars.len()
            ));
            if !provider.provider.is_approved {
                output::print_warning("Provider receives no assignments until approved");
            }
        }
        ProviderCommand::List { page, per_page } => {
            let result = service
                .list_providers(&ctx, PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<ProviderRow> = result
                .items
                .iter()
                .map(|p| ProviderRow {
                    id: p.provider.id.to_string(),
                    name: p.provider.name.clone(),
                    email: p.provider.email.clone(),
                    active: p.provider.is_active,
                    approved: p.provider.is_approved,
                    assignments: p
                        .pillars
                        .iter()
                        .map(|a| format!("{}={}", a.pillar, a.assignment_count))
                        .collect::<Vec<_>>()
                        .join(", "),
                })
                .collect();
            output::print_list(&rows, format);
        }
        ProviderCommand::Approve { id } => {
            let provider = service.set_approved(&ctx, *id, true).await?;
            output::print_success(&format!("Provider '{}' approved", provider.name));
        }
        ProviderCommand::Attach { id, pillar } => {
            let assignment = service.attach_pillar(&ctx, *id, *pillar).await?;
            output::print_success(&format!(
                "Provider now serves {} ({} assignments so far)",
                assignment.pillar, assignment.assignment_count
            ));
        }
    }

    Ok(())
}
