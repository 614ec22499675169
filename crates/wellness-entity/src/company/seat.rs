//! Seat accounting: how many employee accounts a company may keep active.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wellness_core::error::AppError;

/// Seat usage for one company.
///
/// `seat_used` is always the number of active employee memberships; it is
/// counted, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSummary {
    /// Company the summary belongs to.
    pub company_id: Uuid,
    /// Purchased seats.
    pub seat_limit: i32,
    /// Active employees.
    pub seat_used: i32,
    /// Seats still free: `max(0, seat_limit - seat_used)`.
    pub seat_available: i32,
}

impl SeatSummary {
    /// Build a summary from the limit and the active employee count.
    pub fn new(company_id: Uuid, seat_limit: i32, seat_used: i32) -> Self {
        Self {
            company_id,
            seat_limit,
            seat_used,
            seat_available: seat_limit.saturating_sub(seat_used).max(0),
        }
    }

    /// Whether activating one more employee would exceed the limit.
    pub fn is_full(&self) -> bool {
        self.seat_used >= self.seat_limit
    }

    /// Fail with a conflict when there is no free seat.
    pub fn ensure_seat_available(&self) -> Result<(), AppError> {
        if self.is_full() {
            return Err(AppError::conflict(format!(
                "Company has no available seats ({} of {} in use)",
                self.seat_used, self.seat_limit
            )));
        }
        Ok(())
    }
}

/// Check a proposed seat limit against the current number of active employees.
///
/// The limit may equal the active count but never drop below it, and it can
/// never be negative.
pub fn validate_seat_limit(new_limit: i32, seat_used: i32) -> Result<(), AppError> {
    if new_limit < 0 {
        return Err(AppError::validation("Seat limit cannot be negative"));
    }
    if new_limit < seat_used {
        return Err(AppError::validation(format!(
            "Seat limit {new_limit} is below the {seat_used} currently active employees"
        )));
    }
    Ok(())
}
