//! Round-robin assignment procedure.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use wellness_core::result::AppResult;
use wellness_entity::Pillar;
use wellness_entity::provider::{ProviderAssignment, select_next};

use super::db_err;

/// Repository for the per-pillar assignment counters.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Eligible candidates for a pillar, in selection order.
    pub async fn candidates(&self, pillar: Pillar) -> AppResult<Vec<ProviderAssignment>> {
        sqlx::query_as::<_, ProviderAssignment>(
            "SELECT pp.provider_id, pp.pillar, pp.assignment_count, pp.last_assigned_at \
             FROM provider_pillars pp \
             JOIN providers p ON p.id = pp.provider_id \
             WHERE pp.pillar = $1 AND p.is_active AND p.is_approved \
             ORDER BY pp.assignment_count ASC, pp.last_assigned_at ASC NULLS FIRST, pp.provider_id ASC",
        )
        .bind(pillar)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list assignment candidates"))
    }

    /// Pick the next provider for a pillar and record the assignment.
    ///
    /// Returns `None` when no active, approved provider serves the pillar.
    pub async fn assign_next(&self, pillar: Pillar) -> AppResult<Option<ProviderAssignment>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let assigned = assign_next_in(&mut *tx, pillar, Utc::now()).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit assignment"))?;

        Ok(assigned)
    }
}

/// Assign within an open transaction.
///
/// Every eligible counter row for the pillar is locked before choosing, so
/// concurrent callers for the same pillar queue behind each other and each
/// sees the counts written by the previous one.
pub(crate) async fn assign_next_in(
    conn: &mut PgConnection,
    pillar: Pillar,
    now: DateTime<Utc>,
) -> AppResult<Option<ProviderAssignment>> {
    let candidates = sqlx::query_as::<_, ProviderAssignment>(
        "SELECT pp.provider_id, pp.pillar, pp.assignment_count, pp.last_assigned_at \
         FROM provider_pillars pp \
         JOIN providers p ON p.id = pp.provider_id \
         WHERE pp.pillar = $1 AND p.is_active AND p.is_approved \
         ORDER BY pp.provider_id \
         FOR UPDATE OF pp",
    )
    .bind(pillar)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_err("Failed to lock assignment candidates"))?;

    let Some(mut chosen) = select_next(&candidates).cloned() else {
        return Ok(None);
    };
    chosen.record_assignment(now);

    write_counter(conn, &chosen).await?;

    debug!(
        provider_id = %chosen.provider_id,
        pillar = %pillar,
        assignment_count = chosen.assignment_count,
        candidates = candidates.len(),
        "Provider assigned"
    );
    Ok(Some(chosen))
}

async fn write_counter(conn: &mut PgConnection, counter: &ProviderAssignment) -> AppResult<()> {
    sqlx::query(
        "UPDATE provider_pillars SET assignment_count = $3, last_assigned_at = $4 \
         WHERE provider_id = $1 AND pillar = $2",
    )
    .bind(counter.provider_id)
    .bind(counter.pillar)
    .bind(counter.assignment_count)
    .bind(counter.last_assigned_at)
    .execute(conn)
    .await
    .map_err(db_err("Failed to record assignment"))?;
    Ok(())
}
