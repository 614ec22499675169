//! Booking handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_entity::booking::Booking;

use crate::dto::request::{BookSessionDto, OutcomeRequest};
use crate::dto::response::ApiResponse;
use crate::dto::validate;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/bookings
pub async fn book_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BookSessionDto>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), AppError> {
    validate(&req)?;
    let booking = state.booking_service.book(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

/// GET /api/bookings/mine
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state
        .booking_service
        .list_mine(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/bookings/assigned
pub async fn list_assigned(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state
        .booking_service
        .list_assigned(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let booking = state.booking_service.cancel(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/bookings/{id}/outcome
pub async fn record_outcome(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<OutcomeRequest>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let booking = state
        .booking_service
        .record_outcome(&auth, id, req.outcome)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}
