//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_entity::user::AppRole;

/// Who is acting on the current request.
///
/// Built from the access token by the API layer and passed into every
/// service method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Authenticated user.
    pub user_id: Uuid,
    /// Role from the token.
    pub role: AppRole,
    /// Company from the token, if the user belongs to one.
    pub company_id: Option<Uuid>,
    /// E-mail from the token.
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Create a context stamped with the current time.
    pub fn new(user_id: Uuid, role: AppRole, company_id: Option<Uuid>, email: String) -> Self {
        Self {
            user_id,
            role,
            company_id,
            email,
            request_time: Utc::now(),
        }
    }

    /// Context for operator tooling such as the CLI: admin rights and no
    /// backing user account.
    pub fn system() -> Self {
        Self::new(Uuid::nil(), AppRole::Admin, None, "system@localhost".to_string())
    }

    /// The acting user for audit columns; `None` for the system context.
    pub fn actor_id(&self) -> Option<Uuid> {
        (!self.user_id.is_nil()).then_some(self.user_id)
    }

    /// Whether the caller is the platform admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The caller's company, or an authorization error when there is none.
    pub fn require_company(&self) -> Result<Uuid, AppError> {
        self.company_id
            .ok_or_else(|| AppError::authorization("You are not linked to a company"))
    }
}
