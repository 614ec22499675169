//! Invite status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an invite code.
///
/// `Pending` moves to `Accepted` exactly once, or to `Revoked`. Both are
/// terminal. Expiry is not a status; it is evaluated against `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    /// Issued and waiting for redemption.
    Pending,
    /// Redeemed by a user.
    Accepted,
    /// Withdrawn by HR or the admin.
    Revoked,
}

impl InviteStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
