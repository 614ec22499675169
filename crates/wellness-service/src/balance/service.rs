//! Remaining-session queries for employees, HR and the admin.

use std::sync::Arc;

use uuid::Uuid;

use wellness_auth::rbac::{RbacEnforcer, SystemPermission};
use wellness_core::error::AppError;
use wellness_database::repositories::{CompanyRepository, EmployeeRepository};
use wellness_entity::balance::{BalanceSummary, EmployeeBalance};
use wellness_entity::company::Company;
use wellness_entity::employee::Employee;

use crate::context::RequestContext;

/// Reads session balances.
#[derive(Debug, Clone)]
pub struct BalanceService {
    employee_repo: Arc<EmployeeRepository>,
    company_repo: Arc<CompanyRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl BalanceService {
    /// Create a new balance service.
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        company_repo: Arc<CompanyRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            employee_repo,
            company_repo,
            rbac,
        }
    }

    /// The caller's own balance in their active company.
    pub async fn my_balance(&self, ctx: &RequestContext) -> Result<EmployeeBalance, AppError> {
        let employee = self
            .employee_repo
            .find_active_by_user(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("You have no active company membership"))?;
        let company = self.company(employee.company_id).await?;
        Ok(combine(&employee, &company))
    }

    /// An employee's balance, for HR.
    pub async fn employee_balance(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<EmployeeBalance, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::EmployeeView)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, company_id)?;

        let employee = self
            .employee_repo
            .find(company_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("User {user_id} is not an employee of company {company_id}"))
            })?;
        let company = self.company(company_id).await?;
        Ok(combine(&employee, &company))
    }

    /// The company-wide pool.
    pub async fn company_balance(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
    ) -> Result<BalanceSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CompanyView)?;
        self.rbac
            .require_company_scope(ctx.role, ctx.company_id, company_id)?;

        Ok(self.company(company_id).await?.session_balance().summary())
    }

    async fn company(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {company_id} not found")))
    }
}

fn combine(employee: &Employee, company: &Company) -> EmployeeBalance {
    EmployeeBalance::new(
        company.id,
        employee.user_id,
        employee.session_balance(),
        company.session_balance(),
    )
}
