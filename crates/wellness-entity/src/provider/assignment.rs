//! Round-robin assignment counters.
//!
//! Each `(provider, pillar)` pair keeps a counter of how many bookings it has
//! received and when it last received one. The next provider for a pillar is
//! the least-assigned one; ties go to whoever waited longest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pillar::Pillar;

/// Assignment counter for one provider in one pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProviderAssignment {
    /// Provider.
    pub provider_id: Uuid,
    /// Pillar served.
    pub pillar: Pillar,
    /// Bookings assigned so far.
    pub assignment_count: i32,
    /// When the last booking was assigned. `None` means never.
    pub last_assigned_at: Option<DateTime<Utc>>,
}

impl ProviderAssignment {
    /// Fresh counter for a provider that just started serving a pillar.
    pub fn new(provider_id: Uuid, pillar: Pillar) -> Self {
        Self {
            provider_id,
            pillar,
            assignment_count: 0,
            last_assigned_at: None,
        }
    }

    /// Count one more assignment made at `now`.
    pub fn record_assignment(&mut self, now: DateTime<Utc>) {
        self.assignment_count = self.assignment_count.saturating_add(1);
        self.last_assigned_at = Some(now);
    }
}

/// Pick the next provider from the eligible candidates of a pillar.
///
/// Lowest `assignment_count` wins. Ties go to the oldest `last_assigned_at`,
/// with never-assigned providers first, and finally to the lowest provider
/// id so the choice is deterministic.
pub fn select_next(candidates: &[ProviderAssignment]) -> Option<&ProviderAssignment> {
    candidates.iter().min_by(|a, b| {
        a.assignment_count
            .cmp(&b.assignment_count)
            // `None < Some(_)`, so never-assigned sorts first.
            .then_with(|| a.last_assigned_at.cmp(&b.last_assigned_at))
            .then_with(|| a.provider_id.cmp(&b.provider_id))
    })
}
