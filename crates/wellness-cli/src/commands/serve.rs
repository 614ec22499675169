//! Start the HTTP server.

use clap::Args;

use wellness_core::config::AppConfig;
use wellness_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    println!("Starting wellness server on {}", config.server.bind_address());

    let pool = super::create_db_pool(&config).await?;

    if config.database.run_migrations && !args.no_migrate {
        wellness_database::migration::run_migrations(&pool).await?;
    }

    wellness_api::run_server(config, pool).await
}
