//! Company membership handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use wellness_core::error::AppError;

use crate::dto::request::{AllocationRequest, StatusRequest};
use crate::dto::response::{ApiResponse, EmployeeStatusResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/companies/{id}/employees
pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state
        .employee_service
        .list_employees(&auth, company_id, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// PUT /api/companies/{id}/employees/{user_id}/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<ApiResponse<EmployeeStatusResponse>>, AppError> {
    let (employee, seats) = state
        .employee_service
        .set_active(&auth, company_id, user_id, req.active)
        .await?;
    Ok(Json(ApiResponse::ok(EmployeeStatusResponse { employee, seats })))
}

/// PUT /api/companies/{id}/employees/{user_id}/sessions
pub async fn allocate_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AllocationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let employee = state
        .employee_service
        .allocate_sessions(&auth, company_id, user_id, req.sessions_allocated)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": employee })))
}
