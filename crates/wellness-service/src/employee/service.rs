//! Activation, deactivation and session allocation of employees.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use wellness_auth::rbac::{RbacEnforcer, SystemPermission};
use wellness_core::error::AppError;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_database::repositories::EmployeeRepository;
use wellness_entity::company::SeatSummary;
use wellness_entity::employee::{Employee, EmployeeProfile};

use crate::context::RequestContext;

/// HR-side management of company memberships.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    employee_repo: Arc<EmployeeRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl EmployeeService {
    /// Create a new employee service.
    pub fn new(employee_repo: Arc<EmployeeRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { employee_repo, rbac }
    }

    /// List a company's employees.
    pub async fn list_employees(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<EmployeeProfile>, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::EmployeeView)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, company_id)?;
        self.employee_repo.list_by_company(company_id, &page).await
    }

    /// Activate or deactivate an employee. Activation needs a free seat.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        user_id: Uuid,
        active: bool,
    ) -> Result<(Employee, SeatSummary), AppError> {
        self.require_manage(ctx, company_id)?;
        self.employee_repo.set_active(company_id, user_id, active).await
    }

    /// Set an employee's session allocation.
    pub async fn allocate_sessions(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        user_id: Uuid,
        allocated: i32,
    ) -> Result<Employee, AppError> {
        self.require_manage(ctx, company_id)?;

        let employee = self
            .employee_repo
            .update_allocation(company_id, user_id, allocated)
            .await?;
        info!(
            company_id = %company_id,
            user_id = %user_id,
            sessions_allocated = allocated,
            updated_by = %ctx.user_id,
            "Employee sessions allocated"
        );
        Ok(employee)
    }

    fn require_manage(&self, ctx: &RequestContext, company_id: Uuid) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::EmployeeManage)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, company_id)
    }
}
