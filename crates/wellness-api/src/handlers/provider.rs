//! Provider and round-robin assignment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_entity::provider::ProviderAssignment;

use crate::dto::request::{ApprovalRequest, CreateProviderDto, PillarRequest, StatusRequest};
use crate::dto::response::ApiResponse;
use crate::dto::validate;
use crate::extractors::path::parse_pillar;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/providers
pub async fn create_provider(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProviderDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate(&req)?;
    let provider = state.provider_service.create_provider(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": provider })),
    ))
}

/// GET /api/providers
pub async fn list_providers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state
        .provider_service
        .list_providers(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// PUT /api/providers/{id}/approval
pub async fn set_approval(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ApprovalRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let provider = state
        .provider_service
        .set_approved(&auth, id, req.approved)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": provider })))
}

/// PUT /api/providers/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let provider = state.provider_service.set_active(&auth, id, req.active).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": provider })))
}

/// POST /api/providers/{id}/pillars
pub async fn attach_pillar(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<PillarRequest>,
) -> Result<Json<ApiResponse<ProviderAssignment>>, AppError> {
    let assignment = state
        .provider_service
        .attach_pillar(&auth, id, req.pillar)
        .await?;
    Ok(Json(ApiResponse::ok(assignment)))
}

/// DELETE /api/providers/{id}/pillars/{pillar}
pub async fn detach_pillar(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, pillar)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    let pillar = parse_pillar(&pillar)?;
    state.provider_service.detach_pillar(&auth, id, pillar).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/assignments/{pillar}/candidates
pub async fn candidates(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pillar): Path<String>,
) -> Result<Json<ApiResponse<Vec<ProviderAssignment>>>, AppError> {
    let pillar = parse_pillar(&pillar)?;
    let candidates = state.provider_service.candidates(&auth, pillar).await?;
    Ok(Json(ApiResponse::ok(candidates)))
}

/// POST /api/assignments/{pillar}
///
/// Picks the next provider for the pillar and advances its counter.
pub async fn assign_next(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pillar): Path<String>,
) -> Result<Json<ApiResponse<ProviderAssignment>>, AppError> {
    let pillar = parse_pillar(&pillar)?;
    let assignment = state.provider_service.assign_next(&auth, pillar).await?;
    Ok(Json(ApiResponse::ok(assignment)))
}
