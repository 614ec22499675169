//! RBAC guard for routes that have no service behind them.

use wellness_auth::rbac::SystemPermission;
use wellness_core::error::AppError;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Checks that the caller's role grants `permission`.
pub fn require_permission(
    state: &AppState,
    auth: &AuthUser,
    permission: SystemPermission,
) -> Result<(), AppError> {
    state.rbac_enforcer.require_permission(auth.role, permission)
}

