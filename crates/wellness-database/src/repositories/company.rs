//! Company repository: CRUD plus seat and session pool accounting.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_core::result::AppResult;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_entity::company::{Company, CreateCompany, SeatSummary, validate_seat_limit};

use super::db_err;

/// Repository for companies.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    /// Create a new company repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a company by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Company>> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find company"))
    }

    /// List companies by name.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Company>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count companies"))?;

        let companies = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies ORDER BY name ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list companies"))?;

        Ok(PageResponse::new(companies, page, total as u64))
    }

    /// Create a company.
    pub async fn create(&self, data: &CreateCompany) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (name, seat_limit, sessions_allocated) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.seat_limit)
        .bind(data.sessions_allocated)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create company"))
    }

    /// Current seat usage, counted from active memberships.
    pub async fn seat_summary(&self, company_id: Uuid) -> AppResult<SeatSummary> {
        let company = self
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| company_not_found(company_id))?;

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_err("Failed to acquire connection"))?;
        let used = count_active_employees(&mut *conn, company_id).await?;

        Ok(SeatSummary::new(company_id, company.seat_limit, used))
    }

    /// Change the seat limit.
    ///
    /// Locks the company row so no employee can be activated between the
    /// recount and the write.
    pub async fn update_seat_limit(&self, company_id: Uuid, new_limit: i32) -> AppResult<SeatSummary> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        lock_company(&mut *tx, company_id).await?;
        let used = count_active_employees(&mut *tx, company_id).await?;
        validate_seat_limit(new_limit, used)?;

        sqlx::query("UPDATE companies SET seat_limit = $2, updated_at = NOW() WHERE id = $1")
            .bind(company_id)
            .bind(new_limit)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to update seat limit"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit seat limit update"))?;

        info!(company_id = %company_id, seat_limit = new_limit, seat_used = used, "Seat limit updated");
        Ok(SeatSummary::new(company_id, new_limit, used))
    }

    /// Set the size of the company-wide session pool.
    pub async fn update_session_pool(&self, company_id: Uuid, allocated: i32) -> AppResult<Company> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let company = lock_company(&mut *tx, company_id).await?;
        company.session_balance().validate_allocation(allocated)?;

        let updated = sqlx::query_as::<_, Company>(
            "UPDATE companies SET sessions_allocated = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(company_id)
        .bind(allocated)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to update session pool"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit session pool update"))?;

        Ok(updated)
    }

    /// Activate or deactivate the company contract.
    pub async fn set_active(&self, company_id: Uuid, active: bool) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(company_id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update company status"))?
        .ok_or_else(|| company_not_found(company_id))
    }
}

/// Lock a company row for the rest of the transaction.
pub(crate) async fn lock_company(conn: &mut PgConnection, company_id: Uuid) -> AppResult<Company> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1 FOR UPDATE")
        .bind(company_id)
        .fetch_optional(conn)
        .await
        .map_err(db_err("Failed to lock company"))?
        .ok_or_else(|| company_not_found(company_id))
}

/// Number of active memberships, i.e. seats in use.
pub(crate) async fn count_active_employees(conn: &mut PgConnection, company_id: Uuid) -> AppResult<i32> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM company_employees WHERE company_id = $1 AND is_active",
    )
    .bind(company_id)
    .fetch_one(conn)
    .await
    .map_err(db_err("Failed to count active employees"))?;
    Ok(i32::try_from(count).unwrap_or(i32::MAX))
}

/// Lock the company and fail unless a seat is free.
pub(crate) async fn reserve_seat(conn: &mut PgConnection, company_id: Uuid) -> AppResult<SeatSummary> {
    let company = lock_company(&mut *conn, company_id).await?;
    if !company.is_active {
        return Err(AppError::conflict(format!("Company '{}' is not active", company.name)));
    }
    let used = count_active_employees(&mut *conn, company_id).await?;
    let summary = SeatSummary::new(company_id, company.seat_limit, used);
    summary.ensure_seat_available()?;
    Ok(summary)
}

fn company_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Company {id} not found"))
}
