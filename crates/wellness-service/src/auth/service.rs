//! Credential checks and token issuance.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use wellness_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use wellness_auth::password::PasswordHasher;
use wellness_core::error::AppError;
use wellness_database::repositories::UserRepository;
use wellness_entity::user::User;

use crate::context::RequestContext;
use crate::user::service::{UserProfile, UserService};

/// Authenticates users and issues tokens.
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    user_service: Arc<UserService>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        user_service: Arc<UserService>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            user_repo,
            user_service,
            hasher,
            encoder,
            decoder,
        }
    }

    /// Check credentials and issue a token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let invalid = || AppError::authentication("Invalid email or password");

        let Some(user) = self.user_repo.find_by_email(email.trim()).await? else {
            warn!(email = %email, "Login attempt for unknown email");
            return Err(invalid());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(invalid());
        }

        let tokens = self.encoder.generate_token_pair(&user)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(LoginResponse { tokens, user })
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The user is reloaded so the new tokens carry the current role and
    /// company, e.g. right after an invite was redeemed.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        self.reissue(claims.user_id()).await
    }

    /// Issue a fresh pair for a user from their current profile.
    pub async fn reissue(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;
        self.encoder.generate_token_pair(&user)
    }

    /// The caller's profile.
    pub async fn me(&self, ctx: &RequestContext) -> Result<UserProfile, AppError> {
        self.user_service.get_profile(ctx.user_id).await
    }
}
