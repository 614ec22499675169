//! Provider registration, approval, pillar configuration and assignment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wellness_auth::rbac::{RbacEnforcer, SystemPermission};
use wellness_core::error::AppError;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_database::repositories::{AssignmentRepository, ProviderRepository};
use wellness_entity::Pillar;
use wellness_entity::provider::{CreateProvider, Provider, ProviderAssignment, ProviderWithPillars};

use crate::context::RequestContext;

/// Manages providers and hands out assignments.
#[derive(Debug, Clone)]
pub struct ProviderService {
    provider_repo: Arc<ProviderRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    rbac: Arc<RbacEnforcer>,
}

/// Request to register a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProviderRequest {
    /// Display name.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// Linked login account.
    pub user_id: Option<Uuid>,
    /// Pillars served from the start.
    #[serde(default)]
    pub pillars: Vec<Pillar>,
}

impl ProviderService {
    /// Create a new provider service.
    pub fn new(
        provider_repo: Arc<ProviderRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            provider_repo,
            assignment_repo,
            rbac,
        }
    }

    /// Register a provider and attach its initial pillars.
    pub async fn create_provider(
        &self,
        ctx: &RequestContext,
        req: CreateProviderRequest,
    ) -> Result<ProviderWithPillars, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderManage)?;

        if req.name.trim().is_empty() {
            return Err(AppError::validation("Provider name cannot be empty"));
        }

        let provider = self
            .provider_repo
            .create(&CreateProvider {
                user_id: req.user_id,
                name: req.name.trim().to_string(),
                email: req.email.trim().to_string(),
            })
            .await?;

        let mut pillars = Vec::with_capacity(req.pillars.len());
        for pillar in req.pillars {
            pillars.push(self.provider_repo.attach_pillar(provider.id, pillar).await?);
        }

        info!(provider_id = %provider.id, name = %provider.name, "Provider registered");
        Ok(ProviderWithPillars { provider, pillars })
    }

    /// List providers with their per-pillar counters.
    pub async fn list_providers(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<ProviderWithPillars>, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderView)?;
        self.provider_repo.find_all(&page).await
    }

    /// Approve or withdraw approval.
    pub async fn set_approved(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        approved: bool,
    ) -> Result<Provider, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderManage)?;
        let provider = self.provider_repo.set_approved(provider_id, approved).await?;
        info!(provider_id = %provider_id, approved, "Provider approval changed");
        Ok(provider)
    }

    /// Activate or deactivate.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        active: bool,
    ) -> Result<Provider, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderManage)?;
        let provider = self.provider_repo.set_active(provider_id, active).await?;
        info!(provider_id = %provider_id, active, "Provider status changed");
        Ok(provider)
    }

    /// Start serving a pillar.
    pub async fn attach_pillar(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        pillar: Pillar,
    ) -> Result<ProviderAssignment, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderManage)?;
        self.provider_repo.attach_pillar(provider_id, pillar).await
    }

    /// Stop serving a pillar.
    pub async fn detach_pillar(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        pillar: Pillar,
    ) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderManage)?;
        self.provider_repo.detach_pillar(provider_id, pillar).await
    }

    /// Eligible providers for a pillar, next in line first.
    pub async fn candidates(
        &self,
        ctx: &RequestContext,
        pillar: Pillar,
    ) -> Result<Vec<ProviderAssignment>, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderView)?;
        self.assignment_repo.candidates(pillar).await
    }

    /// Pick the next provider for a pillar and count the assignment.
    pub async fn assign_next(
        &self,
        ctx: &RequestContext,
        pillar: Pillar,
    ) -> Result<ProviderAssignment, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ProviderAssign)?;

        let assigned = self
            .assignment_repo
            .assign_next(pillar)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No eligible provider for pillar {pillar}")))?;

        info!(
            provider_id = %assigned.provider_id,
            pillar = %pillar,
            assignment_count = assigned.assignment_count,
            "Provider assigned"
        );
        Ok(assigned)
    }
}
