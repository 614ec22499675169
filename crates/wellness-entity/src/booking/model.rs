//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::BookingStatus;
use crate::pillar::Pillar;

/// A consultation booked by an employee. Each booking consumes one session
/// from the employee's allocation and one from the company pool.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: Uuid,
    /// Employee who booked.
    pub user_id: Uuid,
    /// Company whose pool is charged.
    pub company_id: Uuid,
    /// Provider assigned by round-robin.
    pub provider_id: Uuid,
    /// Pillar of the consultation.
    pub pillar: Pillar,
    /// Status.
    pub status: BookingStatus,
    /// When the consultation takes place.
    pub scheduled_at: DateTime<Utc>,
    /// Free-text notes from the employee.
    pub notes: Option<String>,
    /// When the booking was made.
    pub created_at: DateTime<Utc>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether `user_id` made this booking.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Data required to book a consultation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// Employee.
    pub user_id: Uuid,
    /// Company.
    pub company_id: Uuid,
    /// Pillar.
    pub pillar: Pillar,
    /// Consultation time.
    pub scheduled_at: DateTime<Utc>,
    /// Notes.
    pub notes: Option<String>,
}
