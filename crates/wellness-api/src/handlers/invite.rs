//! Invite issuance and redemption handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use wellness_core::error::AppError;

use crate::dto::request::CreateInviteDto;
use crate::dto::response::{ApiResponse, InviteLookupResponse, RedeemResponse};
use crate::dto::validate;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/companies/{id}/invites
pub async fn create_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(req): Json<CreateInviteDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate(&req)?;
    let invite = state
        .invite_service
        .create_invite(&auth, req.into_request(company_id))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": invite })),
    ))
}

/// GET /api/companies/{id}/invites
pub async fn list_invites(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state
        .invite_service
        .list_invites(&auth, company_id, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// POST /api/invites/{id}/revoke
pub async fn revoke_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let invite = state.invite_service.revoke_invite(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": invite })))
}

/// GET /api/invite-codes/{code}
///
/// Lets a signed-in invitee check a code before redeeming it.
pub async fn lookup_code(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<InviteLookupResponse>>, AppError> {
    let invite = state.invite_service.lookup(&code).await?;
    Ok(Json(ApiResponse::ok(invite.into())))
}

/// POST /api/invite-codes/{code}/redeem
pub async fn redeem_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<RedeemResponse>>, AppError> {
    let redemption = state.invite_service.redeem(&auth, &code).await?;
    let tokens = state.auth_service.reissue(auth.user_id).await?;

    Ok(Json(ApiResponse::ok(RedeemResponse {
        invite: redemption.invite,
        employee: redemption.employee,
        tokens,
    })))
}
