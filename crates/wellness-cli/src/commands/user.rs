//! User management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wellness_core::config::AppConfig;
use wellness_core::error::AppError;
use wellness_core::types::pagination::PageRequest;
use wellness_database::repositories::UserRepository;
use wellness_entity::user::AppRole;
use wellness_service::user::CreateUserRequest;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an account, e.g. the first platform admin
    Create {
        /// Login e-mail
        email: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// Primary role
        #[arg(long, default_value = "user")]
        role: AppRole,
        /// Company to link directly
        #[arg(long)]
        company_id: Option<Uuid>,
        /// Password; prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// List users
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    role: String,
    company: String,
    created_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::Create {
            email,
            name,
            role,
            company_id,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let state = super::build_state(config).await?;
            let user = state
                .user_service
                .create_user(CreateUserRequest {
                    email: email.clone(),
                    password,
                    full_name: name.clone(),
                    role: Some(*role),
                    company_id: *company_id,
                })
                .await?;

            output::print_success(&format!("User '{}' created as {}", user.email, user.role));
            output::print_item(&user, format);
        }
        UserCommand::List { page, per_page } => {
            let pool = super::create_db_pool(&config).await?;
            let result = UserRepository::new(pool)
                .find_all(&PageRequest::new(*page, *per_page))
                .await?;

            let rows: Vec<UserRow> = result
                .items
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone(),
                    name: u.full_name.clone(),
                    role: u.role.to_string(),
                    company: u.company_id.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
