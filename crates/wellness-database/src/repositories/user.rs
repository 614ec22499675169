//! User repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_core::result::AppResult;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_entity::user::{AppRole, CreateUser, User};

use super::{db_err, is_unique_violation};

/// Repository for user profiles and role records.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by id"))
    }

    /// Find a user by e-mail (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by email"))
    }

    /// List users, newest first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total as u64))
    }

    /// Create a user and its primary role record.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, full_name, role, company_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.full_name)
        .bind(data.role)
        .bind(data.company_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Email '{}' is already registered", data.email))
            } else {
                db_err("Failed to create user")(e)
            }
        })?;

        grant_role(&mut *tx, user.id, data.role).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit user creation"))?;

        Ok(user)
    }

    /// All roles held by a user.
    pub async fn roles(&self, user_id: Uuid) -> AppResult<Vec<AppRole>> {
        sqlx::query_scalar::<_, AppRole>(
            "SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load user roles"))
    }
}

/// Insert a role record if absent.
pub(crate) async fn grant_role(conn: &mut PgConnection, user_id: Uuid, role: AppRole) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) \
         ON CONFLICT (user_id, role) DO NOTHING",
    )
    .bind(user_id)
    .bind(role)
    .execute(conn)
    .await
    .map_err(db_err("Failed to grant role"))?;
    Ok(())
}
