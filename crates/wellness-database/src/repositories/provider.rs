//! Provider repository implementation.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_core::result::AppResult;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_entity::Pillar;
use wellness_entity::provider::{CreateProvider, Provider, ProviderAssignment, ProviderWithPillars};

use super::{db_err, is_unique_violation};

/// Repository for providers and the pillars they serve.
#[derive(Debug, Clone)]
pub struct ProviderRepository {
    pool: PgPool,
}

impl ProviderRepository {
    /// Create a new provider repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a provider by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Provider>> {
        sqlx::query_as::<_, Provider>("SELECT * FROM providers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find provider"))
    }

    /// Find the provider record linked to a login account.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Provider>> {
        sqlx::query_as::<_, Provider>("SELECT * FROM providers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find provider by user"))
    }

    /// List providers with their per-pillar counters.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ProviderWithPillars>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM providers")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count providers"))?;

        let providers = sqlx::query_as::<_, Provider>(
            "SELECT * FROM providers ORDER BY name ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list providers"))?;

        let ids: Vec<Uuid> = providers.iter().map(|p| p.id).collect();
        let counters = sqlx::query_as::<_, ProviderAssignment>(
            "SELECT provider_id, pillar, assignment_count, last_assigned_at \
             FROM provider_pillars WHERE provider_id = ANY($1) ORDER BY pillar",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load provider pillars"))?;

        let mut by_provider: HashMap<Uuid, Vec<ProviderAssignment>> = HashMap::new();
        for counter in counters {
            by_provider.entry(counter.provider_id).or_default().push(counter);
        }

        let items = providers
            .into_iter()
            .map(|provider| {
                let pillars = by_provider.remove(&provider.id).unwrap_or_default();
                ProviderWithPillars { provider, pillars }
            })
            .collect();

        Ok(PageResponse::new(items, page, total as u64))
    }

    /// Register a provider. New providers start unapproved.
    pub async fn create(&self, data: &CreateProvider) -> AppResult<Provider> {
        sqlx::query_as::<_, Provider>(
            "INSERT INTO providers (user_id, name, email) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Provider '{}' already exists", data.email))
            } else {
                db_err("Failed to create provider")(e)
            }
        })
    }

    /// Set the approval flag.
    pub async fn set_approved(&self, id: Uuid, approved: bool) -> AppResult<Provider> {
        sqlx::query_as::<_, Provider>(
            "UPDATE providers SET is_approved = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update provider approval"))?
        .ok_or_else(|| provider_not_found(id))
    }

    /// Set the active flag.
    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Provider> {
        sqlx::query_as::<_, Provider>(
            "UPDATE providers SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update provider status"))?
        .ok_or_else(|| provider_not_found(id))
    }

    /// Start serving a pillar. Returns the existing counter if already attached.
    pub async fn attach_pillar(&self, provider_id: Uuid, pillar: Pillar) -> AppResult<ProviderAssignment> {
        if self.find_by_id(provider_id).await?.is_none() {
            return Err(provider_not_found(provider_id));
        }

        sqlx::query(
            "INSERT INTO provider_pillars (provider_id, pillar) VALUES ($1, $2) \
             ON CONFLICT (provider_id, pillar) DO NOTHING",
        )
        .bind(provider_id)
        .bind(pillar)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to attach pillar"))?;

        sqlx::query_as::<_, ProviderAssignment>(
            "SELECT provider_id, pillar, assignment_count, last_assigned_at \
             FROM provider_pillars WHERE provider_id = $1 AND pillar = $2",
        )
        .bind(provider_id)
        .bind(pillar)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to load pillar counter"))
    }

    /// Stop serving a pillar.
    pub async fn detach_pillar(&self, provider_id: Uuid, pillar: Pillar) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM provider_pillars WHERE provider_id = $1 AND pillar = $2")
                .bind(provider_id)
                .bind(pillar)
                .execute(&self.pool)
                .await
                .map_err(db_err("Failed to detach pillar"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Provider {provider_id} does not serve {pillar}"
            )));
        }
        Ok(())
    }
}

fn provider_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Provider {id} not found"))
}
