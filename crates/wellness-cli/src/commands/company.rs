//! Company, seat and session pool commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wellness_core::config::AppConfig;
use wellness_core::error::AppError;
use wellness_core::types::pagination::PageRequest;
use wellness_service::company::CreateCompanyRequest;

use crate::output::{self, OutputFormat};

/// Arguments for company commands
#[derive(Debug, Args)]
pub struct CompanyArgs {
    #[command(subcommand)]
    pub command: CompanyCommand,
}

/// Company subcommands
#[derive(Debug, Subcommand)]
pub enum CompanyCommand {
    /// Register a company
    Create {
        /// Company name
        name: String,
        /// Purchased seats
        #[arg(long)]
        seats: i32,
        /// Company-wide session pool
        #[arg(long, default_value_t = 0)]
        sessions: i32,
    },
    /// List companies
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Show seat usage
    Seats {
        /// Company ID
        id: Uuid,
    },
    /// Change the seat limit
    SetSeats {
        /// Company ID
        id: Uuid,
        /// New seat limit
        limit: i32,
    },
    /// Change the company session pool
    SetSessions {
        /// Company ID
        id: Uuid,
        /// New pool size
        allocated: i32,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct CompanyRow {
    id: String,
    name: String,
    seats: i32,
    sessions: String,
    active: bool,
    created_at: String,
}

/// Execute company commands
pub async fn execute(
    args: &CompanyArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::build_state(config).await?;
    let ctx = super::operator_context();
    let service = &state.company_service;

    match &args.command {
        CompanyCommand::Create {
            name,
            seats,
            sessions,
        } => {
            let company = service
                .create_company(
                    &ctx,
                    CreateCompanyRequest {
                        name: name.clone(),
                        seat_limit: *seats,
                        sessions_allocated: *sessions,
                    },
                )
                .await?;
            output::print_success(&format!("Company '{}' created", company.name));
            output::print_item(&company, format);
        }
        CompanyCommand::List { page, per_page } => {
            let result = service
                .list_companies(&ctx, PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<CompanyRow> = result
                .items
                .iter()
                .map(|c| CompanyRow {
                    id: c.id.to_string(),
                    name: c.name.clone(),
                    seats: c.seat_limit,
                    sessions: format!("{}/{}", c.sessions_used, c.sessions_allocated),
                    active: c.is_active,
                    created_at: c.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        CompanyCommand::Seats { id } => {
            let seats = service.seat_summary(&ctx, *id).await?;
            output::print_item(&seats, format);
        }
        CompanyCommand::SetSeats { id, limit } => {
            let seats = service.update_seat_limit(&ctx, *id, *limit).await?;
            output::print_success(&format!("Seat limit set to {}", seats.seat_limit));
            output::print_item(&seats, format);
        }
        CompanyCommand::SetSessions { id, allocated } => {
            let company = service.allocate_sessions(&ctx, *id, *allocated).await?;
            output::print_success(&format!(
                "Session pool set to {} ({} used)",
                company.sessions_allocated, company.sessions_used
            ));
        }
    }

    Ok(())
}
