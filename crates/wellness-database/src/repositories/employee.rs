//! Employee membership repository.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_core::result::AppResult;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_entity::company::SeatSummary;
use wellness_entity::employee::{CreateEmployee, Employee, EmployeeProfile};

use super::company::{count_active_employees, lock_company};
use super::{db_err, is_unique_violation};

/// Repository for company memberships.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Create a new employee repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the membership of a user in a company.
    pub async fn find(&self, company_id: Uuid, user_id: Uuid) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM company_employees WHERE company_id = $1 AND user_id = $2",
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find employee"))
    }

    /// Find the active membership of a user, if any.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_err("Failed to acquire connection"))?;
        find_active_by_user(&mut *conn, user_id).await
    }

    /// List the memberships of a company with their user profile.
    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<EmployeeProfile>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM company_employees WHERE company_id = $1")
                .bind(company_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err("Failed to count employees"))?;

        let employees = sqlx::query_as::<_, EmployeeProfile>(
            "SELECT ce.id, ce.user_id, u.email, u.full_name, ce.is_active, \
                    ce.sessions_allocated, ce.sessions_used, ce.joined_at \
             FROM company_employees ce \
             JOIN users u ON u.id = ce.user_id \
             WHERE ce.company_id = $1 \
             ORDER BY u.full_name ASC LIMIT $2 OFFSET $3",
        )
        .bind(company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list employees"))?;

        Ok(PageResponse::new(employees, page, total as u64))
    }

    /// Activate or deactivate a membership and return the resulting seat usage.
    ///
    /// Activation needs an active company and a free seat; the company row
    /// stays locked until commit so concurrent activations cannot both take
    /// the last one.
    pub async fn set_active(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        active: bool,
    ) -> AppResult<(Employee, SeatSummary)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let company = lock_company(&mut *tx, company_id).await?;
        let current = lock_membership(&mut *tx, company_id, user_id).await?;

        if active && !current.is_active {
            if !company.is_active {
                return Err(AppError::conflict(format!(
                    "Company '{}' is not active",
                    company.name
                )));
            }
            let used = count_active_employees(&mut *tx, company_id).await?;
            SeatSummary::new(company_id, company.seat_limit, used).ensure_seat_available()?;
        }

        let employee = sqlx::query_as::<_, Employee>(
            "UPDATE company_employees SET is_active = $3, updated_at = NOW() \
             WHERE company_id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(company_id)
        .bind(user_id)
        .bind(active)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to update employee status"))?;

        let used = count_active_employees(&mut *tx, company_id).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit employee status"))?;

        info!(
            company_id = %company_id,
            user_id = %user_id,
            active,
            seat_used = used,
            "Employee status changed"
        );
        Ok((employee, SeatSummary::new(company_id, company.seat_limit, used)))
    }

    /// Set the per-employee session allocation.
    pub async fn update_allocation(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        allocated: i32,
    ) -> AppResult<Employee> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let current = lock_membership(&mut *tx, company_id, user_id).await?;
        current.session_balance().validate_allocation(allocated)?;

        let employee = sqlx::query_as::<_, Employee>(
            "UPDATE company_employees SET sessions_allocated = $3, updated_at = NOW() \
             WHERE company_id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(company_id)
        .bind(user_id)
        .bind(allocated)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to update session allocation"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit session allocation"))?;

        Ok(employee)
    }
}

/// Lock a membership row for the rest of the transaction.
pub(crate) async fn lock_membership(
    conn: &mut PgConnection,
    company_id: Uuid,
    user_id: Uuid,
) -> AppResult<Employee> {
    sqlx::query_as::<_, Employee>(
        "SELECT * FROM company_employees WHERE company_id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(company_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .map_err(db_err("Failed to lock employee"))?
    .ok_or_else(|| {
        AppError::not_found(format!("User {user_id} is not an employee of company {company_id}"))
    })
}

pub(crate) async fn find_active_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> AppResult<Option<Employee>> {
    sqlx::query_as::<_, Employee>(
        "SELECT * FROM company_employees WHERE user_id = $1 AND is_active \
         ORDER BY joined_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .map_err(db_err("Failed to find active membership"))
}

/// Insert an active membership. A second membership in the same company is a conflict.
pub(crate) async fn insert_membership(
    conn: &mut PgConnection,
    data: &CreateEmployee,
) -> AppResult<Employee> {
    sqlx::query_as::<_, Employee>(
        "INSERT INTO company_employees (company_id, user_id, is_active, sessions_allocated) \
         VALUES ($1, $2, TRUE, $3) RETURNING *",
    )
    .bind(data.company_id)
    .bind(data.user_id)
    .bind(data.sessions_allocated)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict(format!(
                "User {} is already an employee of company {}",
                data.user_id, data.company_id
            ))
        } else {
            db_err("Failed to create employee")(e)
        }
    })
}
