//! Company and seat handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wellness_core::error::AppError;

use crate::dto::request::{AllocationRequest, CreateCompanyDto, SeatLimitRequest, StatusRequest};
use crate::dto::validate;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateCompanyDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate(&req)?;
    let company = state.company_service.create_company(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": company })),
    ))
}

/// GET /api/companies
pub async fn list_companies(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state
        .company_service
        .list_companies(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/companies/{id}
pub async fn get_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let company = state.company_service.get_company(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": company })))
}

/// GET /api/companies/{id}/seats
pub async fn seat_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let seats = state.company_service.seat_summary(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": seats })))
}

/// PUT /api/companies/{id}/seats
pub async fn update_seat_limit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SeatLimitRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let seats = state
        .company_service
        .update_seat_limit(&auth, id, req.seat_limit)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": seats })))
}

/// PUT /api/companies/{id}/sessions
pub async fn allocate_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AllocationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let company = state
        .company_service
        .allocate_sessions(&auth, id, req.sessions_allocated)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": company })))
}

/// PUT /api/companies/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let company = state.company_service.set_active(&auth, id, req.active).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": company })))
}
