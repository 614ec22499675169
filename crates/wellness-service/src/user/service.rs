//! Creating accounts and reading profiles.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wellness_auth::password::{PasswordHasher, PasswordValidator};
use wellness_auth::rbac::{RbacEnforcer, SystemPermission};
use wellness_core::error::AppError;
use wellness_database::repositories::UserRepository;
use wellness_entity::user::{AppRole, CreateUser, User};

use crate::context::RequestContext;

/// Account creation and profile lookups.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    rbac: Arc<RbacEnforcer>,
}

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Login e-mail.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Full name.
    pub full_name: String,
    /// Primary role; defaults to `user`.
    pub role: Option<AppRole>,
    /// Company to link directly.
    pub company_id: Option<Uuid>,
}

/// A user with every role they hold.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    /// The user.
    #[serde(flatten)]
    pub user: User,
    /// Roles held, including the primary one.
    pub roles: Vec<AppRole>,
}

impl UserService {
    /// Create a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            rbac,
        }
    }

    /// Create an account without a caller. Used by self-registration and the CLI.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User, AppError> {
        let email = req.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email format"));
        }
        let full_name = req.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::validation("Full name cannot be empty"));
        }
        self.validator
            .validate(&req.password, &[email.as_str(), full_name])?;

        let role = req.role.unwrap_or(AppRole::User);
        let password_hash = self.hasher.hash_password(&req.password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                email,
                password_hash,
                full_name: full_name.to_string(),
                role,
                company_id: req.company_id,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Create an account on behalf of the admin.
    pub async fn create_user_as(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> Result<User, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserCreate)?;
        self.create_user(req).await
    }

    /// Profile with all roles.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let roles = self.user_repo.roles(user_id).await?;
        Ok(UserProfile { user, roles })
    }
}
