//! Session balance accounting.
//!
//! Counters come from the employee membership (`sessions_allocated` /
//! `sessions_used`) or from the company-wide pool. The stored counters are
//! not trusted to satisfy `used <= allocated`: data imported from older
//! systems can overshoot, so every derived value saturates at zero.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wellness_core::error::AppError;

/// Allocated and used session counters for one holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBalance {
    /// Sessions granted.
    pub allocated: i32,
    /// Sessions consumed.
    pub used: i32,
}

impl SessionBalance {
    /// Create a balance from raw counters.
    pub fn new(allocated: i32, used: i32) -> Self {
        Self { allocated, used }
    }

    /// Sessions still available: `max(0, allocated - used)`.
    pub fn remaining(&self) -> i32 {
        self.allocated.saturating_sub(self.used).max(0)
    }

    /// Whether no further session may be consumed.
    pub fn is_at_limit(&self) -> bool {
        self.used >= self.allocated
    }

    /// Check a new allocation against the sessions already consumed.
    pub fn validate_allocation(&self, new_allocated: i32) -> Result<(), AppError> {
        if new_allocated < 0 {
            return Err(AppError::validation("Session allocation cannot be negative"));
        }
        if new_allocated < self.used {
            return Err(AppError::validation(format!(
                "Session allocation {new_allocated} is below the {} sessions already used",
                self.used
            )));
        }
        Ok(())
    }

    /// Flattened view for API responses.
    pub fn summary(&self) -> BalanceSummary {
        BalanceSummary {
            allocated: self.allocated,
            used: self.used,
            remaining: self.remaining(),
            is_at_limit: self.is_at_limit(),
        }
    }
}

/// Serializable balance with the derived fields filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Sessions granted.
    pub allocated: i32,
    /// Sessions consumed.
    pub used: i32,
    /// Sessions still available.
    pub remaining: i32,
    /// Whether the holder cannot book more sessions.
    pub is_at_limit: bool,
}

/// Balance of an employee alongside the pool of their company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeBalance {
    /// Company the membership belongs to.
    pub company_id: Uuid,
    /// Employee user.
    pub user_id: Uuid,
    /// Per-employee allocation.
    pub employee: BalanceSummary,
    /// Company-wide pool.
    pub company: BalanceSummary,
    /// Sessions the employee can actually book: the smaller of the two remainders.
    pub bookable: i32,
}

impl EmployeeBalance {
    /// Combine the two balances.
    pub fn new(company_id: Uuid, user_id: Uuid, employee: SessionBalance, company: SessionBalance) -> Self {
        Self {
            company_id,
            user_id,
            employee: employee.summary(),
            company: company.summary(),
            bookable: employee.remaining().min(company.remaining()),
        }
    }
}
