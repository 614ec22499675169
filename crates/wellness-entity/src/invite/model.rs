//! Invite code entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use wellness_core::error::AppError;

use super::status::InviteStatus;
use crate::user::role::AppRole;

/// A one-time code that links a new user to a company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invite {
    /// Unique invite identifier.
    pub id: Uuid,
    /// Upper-case alphanumeric code handed to the invitee.
    pub code: String,
    /// Company the code grants membership in.
    pub company_id: Uuid,
    /// Intended recipient, informational only.
    pub email: Option<String>,
    /// Role granted on redemption.
    pub role: AppRole,
    /// Sessions allocated to the new membership.
    pub sessions_allocated: i32,
    /// Lifecycle status.
    pub status: InviteStatus,
    /// When the code stops being redeemable. `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Who issued the code.
    pub created_by: Option<Uuid>,
    /// Who redeemed the code.
    pub accepted_by: Option<Uuid>,
    /// When the code was redeemed.
    pub accepted_at: Option<DateTime<Utc>>,
    /// When the code was issued.
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// Whether the code has passed its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp < now)
    }

    /// Check that the code can be redeemed at `now`.
    ///
    /// Expiry is checked first and applies whatever the status is.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.is_expired(now) {
            return Err(AppError::validation(format!(
                "Invite code '{}' has expired",
                self.code
            )));
        }
        if self.status.is_terminal() {
            return Err(AppError::validation(format!(
                "Invite code '{}' is not pending (status: {})",
                self.code, self.status
            )));
        }
        Ok(())
    }

    /// Mark the invite as redeemed by `user_id`.
    pub fn accept(&mut self, user_id: Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        self.check_redeemable(now)?;
        self.status = InviteStatus::Accepted;
        self.accepted_by = Some(user_id);
        self.accepted_at = Some(now);
        Ok(())
    }

    /// Withdraw a pending invite.
    pub fn revoke(&mut self) -> Result<(), AppError> {
        if self.status.is_terminal() {
            return Err(AppError::validation(format!(
                "Only pending invites can be revoked (status: {})",
                self.status
            )));
        }
        self.status = InviteStatus::Revoked;
        Ok(())
    }
}

/// Data required to issue an invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvite {
    /// Generated code.
    pub code: String,
    /// Target company.
    pub company_id: Uuid,
    /// Intended recipient.
    pub email: Option<String>,
    /// Role granted on redemption.
    pub role: AppRole,
    /// Sessions for the new membership.
    pub sessions_allocated: i32,
    /// Expiry timestamp.
    pub expires_at: Option<DateTime<Utc>>,
    /// Issuer.
    pub created_by: Option<Uuid>,
}
