//! Invite issuance, listing, revocation and redemption.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use wellness_auth::rbac::{RbacEnforcer, SystemPermission};
use wellness_core::config::InviteConfig;
use wellness_core::error::{AppError, ErrorKind};
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_database::repositories::{CompanyRepository, InviteRepository, Redemption};
use wellness_entity::invite::{CreateInvite, Invite};
use wellness_entity::user::AppRole;

use super::code::generate_code;
use crate::context::RequestContext;

/// How many fresh codes to try before giving up on collisions.
const MAX_CODE_ATTEMPTS: usize = 3;

/// Issues and redeems invite codes.
#[derive(Debug, Clone)]
pub struct InviteService {
    invite_repo: Arc<InviteRepository>,
    company_repo: Arc<CompanyRepository>,
    rbac: Arc<RbacEnforcer>,
    config: InviteConfig,
}

/// Request to issue an invite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInviteRequest {
    /// Target company.
    pub company_id: Uuid,
    /// Intended recipient.
    pub email: Option<String>,
    /// Role granted on redemption; defaults to `user`.
    pub role: Option<AppRole>,
    /// Sessions for the new membership; defaults to the configured value.
    pub sessions_allocated: Option<i32>,
    /// Days until expiry; `0` never expires, absent uses the configured default.
    pub expires_in_days: Option<u32>,
}

impl InviteService {
    /// Create a new invite service.
    pub fn new(
        invite_repo: Arc<InviteRepository>,
        company_repo: Arc<CompanyRepository>,
        rbac: Arc<RbacEnforcer>,
        config: InviteConfig,
    ) -> Self {
        Self {
            invite_repo,
            company_repo,
            rbac,
            config,
        }
    }

    /// Issue a new pending invite for a company.
    pub async fn create_invite(
        &self,
        ctx: &RequestContext,
        req: CreateInviteRequest,
    ) -> Result<Invite, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::InviteCreate)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, req.company_id)?;

        let role = req.role.unwrap_or(AppRole::User);
        if matches!(role, AppRole::Admin | AppRole::Prestador) {
            return Err(AppError::validation(format!(
                "Invites cannot grant the '{role}' role"
            )));
        }

        let sessions_allocated = req.sessions_allocated.unwrap_or(self.config.default_sessions);
        if sessions_allocated < 0 {
            return Err(AppError::validation("Session allocation cannot be negative"));
        }

        let company = self
            .company_repo
            .find_by_id(req.company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {} not found", req.company_id)))?;
        if !company.is_active {
            return Err(AppError::conflict(format!("Company '{}' is not active", company.name)));
        }

        let expires_at = expiry(
            ctx.request_time,
            req.expires_in_days.unwrap_or(self.config.default_expiry_days),
        )?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let data = CreateInvite {
                code: generate_code(self.config.code_length),
                company_id: req.company_id,
                email: req.email.clone(),
                role,
                sessions_allocated,
                expires_at,
                created_by: ctx.actor_id(),
            };

            match self.invite_repo.create(&data).await {
                Ok(invite) => {
                    info!(
                        invite_id = %invite.id,
                        company_id = %invite.company_id,
                        created_by = %ctx.user_id,
                        "Invite created"
                    );
                    return Ok(invite);
                }
                Err(e) if e.is(ErrorKind::Conflict) && attempt < MAX_CODE_ATTEMPTS => {
                    warn!(attempt, "Invite code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// List a company's invites.
    pub async fn list_invites(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<Invite>, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::InviteView)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, company_id)?;

        self.invite_repo.list_by_company(company_id, &page).await
    }

    /// Revoke a pending invite.
    pub async fn revoke_invite(&self, ctx: &RequestContext, invite_id: Uuid) -> Result<Invite, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::InviteRevoke)?;

        let invite = self
            .invite_repo
            .find_by_id(invite_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invite {invite_id} not found")))?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, invite.company_id)?;

        let revoked = self.invite_repo.revoke(invite_id).await?;
        info!(invite_id = %invite_id, revoked_by = %ctx.user_id, "Invite revoked");
        Ok(revoked)
    }

    /// Find a code without redeeming it. Expired or used codes are still
    /// returned so the caller can show why they cannot be redeemed.
    pub async fn lookup(&self, code: &str) -> Result<Invite, AppError> {
        self.invite_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invite code '{}' not found", code.trim())))
    }

    /// Redeem a code for the calling user.
    pub async fn redeem(&self, ctx: &RequestContext, code: &str) -> Result<Redemption, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::validation("Invite code is required"));
        }
        self.invite_repo.redeem(code, ctx.user_id).await
    }
}

/// Expiry timestamp for an invite issued at `now`. Zero days never expires.
fn expiry(now: DateTime<Utc>, days: u32) -> Result<Option<DateTime<Utc>>, AppError> {
    if days == 0 {
        return Ok(None);
    }
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_add_signed(span))
        .map(Some)
        .ok_or_else(|| AppError::validation(format!("Invite expiry of {days} days is out of range")))
}
