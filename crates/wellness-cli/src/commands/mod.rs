//! CLI command definitions and dispatch.

pub mod company;
pub mod invite;
pub mod migrate;
pub mod provider;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use wellness_api::AppState;
use wellness_core::config::AppConfig;
use wellness_core::error::AppError;
use wellness_service::context::RequestContext;

use crate::output::OutputFormat;

/// Wellness platform administration
#[derive(Debug, Parser)]
#[command(name = "wellness", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file; defaults to `config/` with `WELLNESS_ENV`
    #[arg(short, long)]
    pub config: Option<String>,

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
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Company, seat and session pool management
    Company(company::CompanyArgs),
    /// Invite code management
    Invite(invite::InviteArgs),
    /// Provider management
    Provider(provider::ProviderArgs),
    /// User management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.config.as_deref())?;

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::Company(args) => company::execute(args, config, self.format).await,
            Commands::Invite(args) => invite::execute(args, config, self.format).await,
            Commands::Provider(args) => provider::execute(args, config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
        }
    }
}

/// Load configuration from an explicit file or from `config/` for `WELLNESS_ENV`.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => {
            let env = std::env::var("WELLNESS_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Create a database pool from config.
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = wellness_database::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Connect and wire every service, as the server does.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let pool = create_db_pool(&config).await?;
    Ok(AppState::new(config, pool))
}

/// The operator running the CLI acts as the platform admin.
pub fn operator_context() -> RequestContext {
    RequestContext::system()
}
