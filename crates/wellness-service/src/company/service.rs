//! Company CRUD, seat limit and session pool management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wellness_auth::rbac::{RbacEnforcer, SystemPermission};
use wellness_core::error::AppError;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_database::repositories::CompanyRepository;
use wellness_entity::company::{Company, CreateCompany, SeatSummary};

use crate::context::RequestContext;

/// Manages companies, their seats and their session pool.
#[derive(Debug, Clone)]
pub struct CompanyService {
    company_repo: Arc<CompanyRepository>,
    rbac: Arc<RbacEnforcer>,
}

/// Request to create a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    /// Company name.
    pub name: String,
    /// Purchased seats.
    pub seat_limit: i32,
    /// Company-wide session pool.
    pub sessions_allocated: i32,
}

impl CompanyService {
    /// Create a new company service.
    pub fn new(company_repo: Arc<CompanyRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { company_repo, rbac }
    }

    /// Register a company.
    pub async fn create_company(
        &self,
        ctx: &RequestContext,
        req: CreateCompanyRequest,
    ) -> Result<Company, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CompanyManageAll)?;

        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Company name cannot be empty"));
        }
        if req.seat_limit < 0 || req.sessions_allocated < 0 {
            return Err(AppError::validation(
                "Seat limit and session pool cannot be negative",
            ));
        }

        let company = self
            .company_repo
            .create(&CreateCompany {
                name: name.to_string(),
                seat_limit: req.seat_limit,
                sessions_allocated: req.sessions_allocated,
            })
            .await?;

        info!(company_id = %company.id, name = %company.name, "Company created");
        Ok(company)
    }

    /// List all companies.
    pub async fn list_companies(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Company>, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CompanyManageAll)?;
        self.company_repo.find_all(&page).await
    }

    /// Fetch one company.
    pub async fn get_company(&self, ctx: &RequestContext, company_id: Uuid) -> Result<Company, AppError> {
        self.require_view(ctx, company_id)?;
        self.company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {company_id} not found")))
    }

    /// Seats purchased, used and available.
    pub async fn seat_summary(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
    ) -> Result<SeatSummary, AppError> {
        self.require_view(ctx, company_id)?;
        self.company_repo.seat_summary(company_id).await
    }

    /// Change the seat limit. It can never drop below the active employee count.
    pub async fn update_seat_limit(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        new_limit: i32,
    ) -> Result<SeatSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CompanySeatManage)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, company_id)?;

        self.company_repo.update_seat_limit(company_id, new_limit).await
    }

    /// Resize the company-wide session pool.
    pub async fn allocate_sessions(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        allocated: i32,
    ) -> Result<Company, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CompanyPoolManage)?;

        let company = self
            .company_repo
            .update_session_pool(company_id, allocated)
            .await?;
        info!(
            company_id = %company_id,
            sessions_allocated = allocated,
            updated_by = %ctx.user_id,
            "Company session pool updated"
        );
        Ok(company)
    }

    /// Activate or suspend a company contract.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        active: bool,
    ) -> Result<Company, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CompanyManageAll)?;
        let company = self.company_repo.set_active(company_id, active).await?;
        info!(company_id = %company_id, active, "Company status changed");
        Ok(company)
    }

    fn require_view(&self, ctx: &RequestContext, company_id: Uuid) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CompanyView)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, company_id)
    }
}
