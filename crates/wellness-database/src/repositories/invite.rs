//! Invite repository, including the redemption transaction.

use chrono::Utc;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_core::result::AppResult;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_entity::employee::{CreateEmployee, Employee};
use wellness_entity::invite::{CreateInvite, Invite};

use super::company::reserve_seat;
use super::employee::insert_membership;
use super::user::grant_role;
use super::{db_err, is_unique_violation};

/// Outcome of a successful redemption.
#[derive(Debug, Clone, Serialize)]
pub struct Redemption {
    /// The invite, now accepted.
    pub invite: Invite,
    /// The membership created for the redeeming user.
    pub employee: Employee,
}

/// Repository for invite codes.
#[derive(Debug, Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Create a new invite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an invite by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find invite"))
    }

    /// Find an invite by code. Codes are matched upper-cased.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE code = $1")
            .bind(normalize_code(code))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find invite by code"))
    }

    /// List the invites of a company, newest first.
    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Invite>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invites WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count invites"))?;

        let invites = sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE company_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(company_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list invites"))?;

        Ok(PageResponse::new(invites, page, total as u64))
    }

    /// Store a new pending invite. A duplicate code is reported as a conflict.
    pub async fn create(&self, data: &CreateInvite) -> AppResult<Invite> {
        sqlx::query_as::<_, Invite>(
            "INSERT INTO invites (code, company_id, email, role, sessions_allocated, expires_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(normalize_code(&data.code))
        .bind(data.company_id)
        .bind(&data.email)
        .bind(data.role)
        .bind(data.sessions_allocated)
        .bind(data.expires_at)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Invite code '{}' already exists", data.code))
            } else {
                db_err("Failed to create invite")(e)
            }
        })
    }

    /// Revoke a pending invite.
    pub async fn revoke(&self, id: Uuid) -> AppResult<Invite> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let mut invite = sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("Failed to lock invite"))?
            .ok_or_else(|| AppError::not_found(format!("Invite {id} not found")))?;

        invite.revoke()?;
        let invite = write_status(&mut *tx, &invite).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit invite revocation"))?;

        Ok(invite)
    }

    /// Redeem a code for `user_id`.
    ///
    /// Runs as one transaction: the invite row and then the company row are
    /// locked, so two users racing for the same code or the last seat cannot
    /// both succeed. Any failure leaves nothing behind.
    pub async fn redeem(&self, code: &str, user_id: Uuid) -> AppResult<Redemption> {
        let code = normalize_code(code);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let mut invite = sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE code = $1 FOR UPDATE")
            .bind(&code)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("Failed to lock invite"))?
            .ok_or_else(|| AppError::not_found(format!("Invite code '{code}' not found")))?;

        invite.accept(user_id, Utc::now())?;

        let already_member: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM company_employees WHERE company_id = $1 AND user_id = $2)",
        )
        .bind(invite.company_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to check existing membership"))?;

        if already_member {
            return Err(AppError::conflict("User is already an employee of this company"));
        }

        reserve_seat(&mut *tx, invite.company_id).await?;

        let employee = insert_membership(
            &mut *tx,
            &CreateEmployee {
                company_id: invite.company_id,
                user_id,
                sessions_allocated: invite.sessions_allocated,
            },
        )
        .await?;

        grant_role(&mut *tx, user_id, invite.role).await?;
        let invite = write_status(&mut *tx, &invite).await?;

        // A plain user invited as HR is promoted; other primary roles are kept.
        let stamped = sqlx::query(
            "UPDATE users SET company_id = $2, \
                 role = CASE WHEN role = 'user' THEN $3 ELSE role END, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(invite.company_id)
        .bind(invite.role)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to link user to company"))?;

        if stamped.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit invite redemption"))?;

        info!(
            invite_id = %invite.id,
            company_id = %invite.company_id,
            user_id = %user_id,
            "Invite redeemed"
        );
        Ok(Redemption { invite, employee })
    }
}

async fn write_status(conn: &mut PgConnection, invite: &Invite) -> AppResult<Invite> {
    sqlx::query_as::<_, Invite>(
        "UPDATE invites SET status = $2, accepted_by = $3, accepted_at = $4 \
         WHERE id = $1 RETURNING *",
    )
    .bind(invite.id)
    .bind(invite.status)
    .bind(invite.accepted_by)
    .bind(invite.accepted_at)
    .fetch_one(conn)
    .await
    .map_err(db_err("Failed to update invite status"))
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
