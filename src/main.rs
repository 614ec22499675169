//! Wellness platform server.
//!
//! Main entry point: loads configuration, sets up logging, connects to
//! PostgreSQL and serves the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use wellness_core::config::AppConfig;
use wellness_core::error::AppError;
use wellness_database::DatabasePool;
use wellness_database::connection::mask_password;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// `config/default.toml`, the `WELLNESS_ENV` overlay, then `WELLNESS__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("WELLNESS_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing. `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting wellness server");

    // ── Database connection + migrations ─────────────────────────
    tracing::info!(url = %mask_password(&config.database.url), "Connecting to database");
    let db_pool = DatabasePool::connect(&config.database).await?.into_pool();

    if config.database.run_migrations {
        wellness_database::migration::run_migrations(&db_pool).await?;
    } else {
        tracing::info!("Skipping migrations (database.run_migrations = false)");
    }

    // ── HTTP server ──────────────────────────────────────────────
    wellness_api::run_server(config, db_pool).await?;

    tracing::info!("Wellness server shut down gracefully");
    Ok(())
}
