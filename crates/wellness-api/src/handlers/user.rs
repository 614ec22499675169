//! Admin user management.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use wellness_core::error::AppError;

use crate::dto::request::CreateUserDto;
use crate::dto::validate;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate(&req)?;
    let user = state.user_service.create_user_as(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": user })),
    ))
}
