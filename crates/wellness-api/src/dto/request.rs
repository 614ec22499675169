//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use wellness_entity::Pillar;
use wellness_entity::booking::BookingStatus;
use wellness_entity::user::AppRole;
use wellness_service::booking::BookSessionRequest;
use wellness_service::company::CreateCompanyRequest;
use wellness_service::invite::CreateInviteRequest;
use wellness_service::provider::CreateProviderRequest;
use wellness_service::user::CreateUserRequest;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// E-mail.
    #[validate(email(message = "A valid e-mail is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Self-service sign-up. Accounts start as plain users with no company.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid e-mail is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,
}

impl From<RegisterRequest> for CreateUserRequest {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            role: None,
            company_id: None,
        }
    }
}

/// Create user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserDto {
    #[validate(email(message = "A valid e-mail is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    pub role: Option<AppRole>,
    pub company_id: Option<Uuid>,
}

impl From<CreateUserDto> for CreateUserRequest {
    fn from(dto: CreateUserDto) -> Self {
        Self {
            email: dto.email,
            password: dto.password,
            full_name: dto.full_name,
            role: dto.role,
            company_id: dto.company_id,
        }
    }
}

/// Create company request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCompanyDto {
    /// Company name.
    #[validate(length(min = 1, max = 200, message = "Company name is required"))]
    pub name: String,
    /// Purchased seats.
    #[validate(range(min = 0, message = "Seat limit cannot be negative"))]
    pub seat_limit: i32,
    /// Company session pool.
    #[serde(default)]
    #[validate(range(min = 0, message = "Session pool cannot be negative"))]
    pub sessions_allocated: i32,
}

impl From<CreateCompanyDto> for CreateCompanyRequest {
    fn from(dto: CreateCompanyDto) -> Self {
        Self {
            name: dto.name,
            seat_limit: dto.seat_limit,
            sessions_allocated: dto.sessions_allocated,
        }
    }
}

/// `PUT /companies/{id}/seats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatLimitRequest {
    /// New seat limit.
    pub seat_limit: i32,
}

/// Session allocation for a company pool or a single employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// New allocation.
    pub sessions_allocated: i32,
}

/// Activate or deactivate a company, membership or provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    /// Target state.
    pub active: bool,
}

/// Approve or unapprove a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Target state.
    pub approved: bool,
}

/// Issue an invite for the company in the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateInviteDto {
    /// Intended recipient.
    #[validate(email(message = "Invite e-mail is not valid"))]
    pub email: Option<String>,
    /// Role granted on redemption.
    pub role: Option<AppRole>,
    /// Sessions for the new membership.
    #[validate(range(min = 0, message = "Sessions cannot be negative"))]
    pub sessions_allocated: Option<i32>,
    /// Days until expiry; `0` never expires.
    #[validate(range(max = 365, message = "Invites expire within a year"))]
    pub expires_in_days: Option<u32>,
}

impl CreateInviteDto {
    /// Attach the target company from the path.
    pub fn into_request(self, company_id: Uuid) -> CreateInviteRequest {
        CreateInviteRequest {
            company_id,
            email: self.email,
            role: self.role,
            sessions_allocated: self.sessions_allocated,
            expires_in_days: self.expires_in_days,
        }
    }
}

/// Register a provider.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProviderDto {
    #[validate(length(min = 1, max = 200, message = "Provider name is required"))]
    pub name: String,
    #[validate(email(message = "A valid e-mail is required"))]
    pub email: String,
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub pillars: Vec<Pillar>,
}

impl From<CreateProviderDto> for CreateProviderRequest {
    fn from(dto: CreateProviderDto) -> Self {
        Self {
            name: dto.name,
            email: dto.email,
            user_id: dto.user_id,
            pillars: dto.pillars,
        }
    }
}

/// Attach a pillar to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarRequest {
    /// Pillar to serve.
    pub pillar: Pillar,
}

/// Book a consultation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookSessionDto {
    /// Pillar of the consultation.
    pub pillar: Pillar,
    /// When it takes place.
    pub scheduled_at: DateTime<Utc>,
    /// Notes for the provider.
    #[validate(length(max = 2000, message = "Notes are limited to 2000 characters"))]
    pub notes: Option<String>,
}

impl From<BookSessionDto> for BookSessionRequest {
    fn from(dto: BookSessionDto) -> Self {
        Self {
            pillar: dto.pillar,
            scheduled_at: dto.scheduled_at,
            notes: dto.notes,
        }
    }
}

/// Record how a consultation ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRequest {
    /// `completed` or `no_show`.
    pub outcome: BookingStatus,
}
