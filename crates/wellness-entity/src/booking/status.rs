//! Booking status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a consultation booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booked and upcoming.
    Scheduled,
    /// Delivered.
    Completed,
    /// Cancelled before it took place.
    Cancelled,
    /// The employee did not attend.
    NoShow,
}

impl BookingStatus {
    /// Whether the booking can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Scheduled)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
