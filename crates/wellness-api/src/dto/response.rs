//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wellness_auth::jwt::TokenPair;
use wellness_entity::company::SeatSummary;
use wellness_entity::employee::Employee;
use wellness_entity::invite::{Invite, InviteStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Basic health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Health check with database details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// `connected` or `unreachable`.
    pub database: String,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Result of redeeming an invite code.
///
/// The caller's previous tokens carry no company, so fresh ones are
/// issued alongside the new membership.
#[derive(Debug, Clone, Serialize)]
pub struct RedeemResponse {
    pub invite: Invite,
    pub employee: Employee,
    pub tokens: TokenPair,
}

/// A membership after (de)activation, with the company's seats.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeStatusResponse {
    pub employee: Employee,
    pub seats: SeatSummary,
}

/// Public view of an invite looked up by code.
#[derive(Debug, Clone, Serialize)]
pub struct InviteLookupResponse {
    pub code: String,
    pub company_id: Uuid,
    pub status: InviteStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub redeemable: bool,
}

impl From<Invite> for InviteLookupResponse {
    fn from(invite: Invite) -> Self {
        let redeemable = invite.check_redeemable(Utc::now()).is_ok();
        Self {
            code: invite.code,
            company_id: invite.company_id,
            status: invite.status,
            expires_at: invite.expires_at,
            redeemable,
        }
    }
}
