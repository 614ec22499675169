//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use wellness_auth::rbac::SystemPermission;
use wellness_core::error::AppError;
use wellness_database::connection::ping;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<DetailedHealthResponse>>, AppError> {
    require_permission(&state, &auth, SystemPermission::SystemHealth)?;

    let (status, database) = match ping(&state.db_pool).await {
        Ok(true) => ("ok", "connected"),
        Ok(false) => ("degraded", "unreachable"),
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            ("degraded", "unreachable")
        }
    };

    Ok(Json(ApiResponse::ok(DetailedHealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: database.to_string(),
        pool_size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
    })))
}
