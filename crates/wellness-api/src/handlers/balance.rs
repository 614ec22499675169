//! Session balance handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_entity::balance::{BalanceSummary, EmployeeBalance};

use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/balance/me
pub async fn my_balance(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<EmployeeBalance>>, AppError> {
    let balance = state.balance_service.my_balance(&auth).await?;
    Ok(Json(ApiResponse::ok(balance)))
}

/// GET /api/companies/{id}/employees/{user_id}/balance
pub async fn employee_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<EmployeeBalance>>, AppError> {
    let balance = state
        .balance_service
        .employee_balance(&auth, company_id, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(balance)))
}

/// GET /api/companies/{id}/balance
pub async fn company_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BalanceSummary>>, AppError> {
    let balance = state.balance_service.company_balance(&auth, company_id).await?;
    Ok(Json(ApiResponse::ok(balance)))
}
