//! Booking repository: booking and cancelling with session accounting.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_core::result::AppResult;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_entity::booking::{Booking, BookingStatus, CreateBooking};

use super::assignment::assign_next_in;
use super::company::lock_company;
use super::db_err;
use super::employee::lock_membership;

/// Repository for bookings.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find booking"))
    }

    /// Bookings made by a user, latest appointment first.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.list_where("user_id", user_id, page).await
    }

    /// Bookings assigned to a provider.
    pub async fn list_by_provider(
        &self,
        provider_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        self.list_where("provider_id", provider_id, page).await
    }

    async fn list_where(
        &self,
        column: &'static str,
        id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM bookings WHERE {column} = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count bookings"))?;

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT * FROM bookings WHERE {column} = $1 \
             ORDER BY scheduled_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list bookings"))?;

        Ok(PageResponse::new(bookings, page, total as u64))
    }

    /// Book a consultation.
    ///
    /// In one transaction: lock the company and the membership, check both
    /// balances, pick a provider by round-robin, insert the booking and
    /// charge one session to the employee and to the company pool.
    pub async fn create(&self, data: &CreateBooking) -> AppResult<Booking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let company = lock_company(&mut *tx, data.company_id).await?;
        if !company.is_active {
            return Err(AppError::conflict(format!("Company '{}' is not active", company.name)));
        }

        let employee = lock_membership(&mut *tx, data.company_id, data.user_id).await?;
        if !employee.is_active {
            return Err(AppError::authorization("Employee membership is not active"));
        }

        if employee.session_balance().is_at_limit() || company.session_balance().is_at_limit() {
            return Err(AppError::conflict("No sessions remaining"));
        }

        let assigned = assign_next_in(&mut *tx, data.pillar, Utc::now())
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No eligible provider for pillar {}", data.pillar))
            })?;

        let booking = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (user_id, company_id, provider_id, pillar, scheduled_at, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.company_id)
        .bind(assigned.provider_id)
        .bind(data.pillar)
        .bind(data.scheduled_at)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to create booking"))?;

        adjust_usage(&mut *tx, data.company_id, data.user_id, 1).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit booking"))?;

        info!(
            booking_id = %booking.id,
            user_id = %booking.user_id,
            provider_id = %booking.provider_id,
            pillar = %booking.pillar,
            "Booking created"
        );
        Ok(booking)
    }

    /// Cancel a scheduled booking and give the session back.
    ///
    /// Only the owner may cancel unless `override_owner` is set. Locks the
    /// company row before the booking row.
    pub async fn cancel(&self, id: Uuid, actor_id: Uuid, override_owner: bool) -> AppResult<Booking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let company_id: Uuid = sqlx::query_scalar("SELECT company_id FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("Failed to find booking"))?
            .ok_or_else(|| booking_not_found(id))?;

        lock_company(&mut *tx, company_id).await?;
        let booking = lock_booking(&mut *tx, id).await?;

        if !override_owner && !booking.is_owned_by(actor_id) {
            return Err(AppError::authorization("You can only cancel your own bookings"));
        }
        if !booking.status.is_cancellable() {
            return Err(AppError::validation(format!(
                "Only scheduled bookings can be cancelled (status: {})",
                booking.status
            )));
        }

        adjust_usage(&mut *tx, booking.company_id, booking.user_id, -1).await?;

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, cancelled_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(BookingStatus::Cancelled)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to cancel booking"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit cancellation"))?;

        info!(booking_id = %id, actor_id = %actor_id, "Booking cancelled");
        Ok(booking)
    }

    /// Record how a scheduled booking ended. The session stays consumed.
    pub async fn record_outcome(&self, id: Uuid, outcome: BookingStatus) -> AppResult<Booking> {
        if !matches!(outcome, BookingStatus::Completed | BookingStatus::NoShow) {
            return Err(AppError::validation(format!(
                "'{outcome}' is not a booking outcome"
            )));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let booking = lock_booking(&mut *tx, id).await?;
        if booking.status != BookingStatus::Scheduled {
            return Err(AppError::validation(format!(
                "Booking is already {}",
                booking.status
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(outcome)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to update booking"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit booking outcome"))?;

        Ok(booking)
    }
}

async fn lock_booking(conn: &mut PgConnection, id: Uuid) -> AppResult<Booking> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_err("Failed to lock booking"))?
        .ok_or_else(|| booking_not_found(id))
}

fn booking_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Booking {id} not found"))
}

/// Move `sessions_used` on both the membership and the company pool by
/// `delta`, never below zero.
async fn adjust_usage(
    conn: &mut PgConnection,
    company_id: Uuid,
    user_id: Uuid,
    delta: i32,
) -> AppResult<()> {
    sqlx::query(
        "UPDATE company_employees \
         SET sessions_used = GREATEST(sessions_used + $3, 0), updated_at = NOW() \
         WHERE company_id = $1 AND user_id = $2",
    )
    .bind(company_id)
    .bind(user_id)
    .bind(delta)
    .execute(&mut *conn)
    .await
    .map_err(db_err("Failed to update employee usage"))?;

    sqlx::query(
        "UPDATE companies \
         SET sessions_used = GREATEST(sessions_used + $2, 0), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(company_id)
    .bind(delta)
    .execute(conn)
    .await
    .map_err(db_err("Failed to update company usage"))?;

    Ok(())
}
