//! Provider entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::assignment::ProviderAssignment;

/// A service provider who delivers sessions in one or more pillars.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Provider {
    /// Unique provider identifier.
    pub id: Uuid,
    /// Linked login account, if the provider signs in.
    pub user_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// Whether the provider currently takes bookings.
    pub is_active: bool,
    /// Whether the platform admin approved the provider.
    pub is_approved: bool,
    /// When the provider was created.
    pub created_at: DateTime<Utc>,
    /// When the provider was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProvider {
    /// Linked login account.
    pub user_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
}

/// Provider listing row with its per-pillar counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderWithPillars {
    /// The provider.
    #[serde(flatten)]
    pub provider: Provider,
    /// One counter per pillar the provider serves.
    pub pillars: Vec<ProviderAssignment>,
}
