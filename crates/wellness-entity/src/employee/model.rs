//! Employee membership model: links a user to a company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::balance::SessionBalance;

/// A user's membership in a company, holding their personal session quota.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Membership identifier.
    pub id: Uuid,
    /// Company.
    pub company_id: Uuid,
    /// Employee user.
    pub user_id: Uuid,
    /// Whether the membership occupies a seat.
    pub is_active: bool,
    /// Sessions granted to this employee.
    pub sessions_allocated: i32,
    /// Sessions consumed by this employee.
    pub sessions_used: i32,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
    /// When the membership was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Session balance of this employee.
    pub fn session_balance(&self) -> SessionBalance {
        SessionBalance::new(self.sessions_allocated, self.sessions_used)
    }
}

/// Membership joined with the user profile, for HR listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeProfile {
    /// Membership identifier.
    pub id: Uuid,
    /// Employee user.
    pub user_id: Uuid,
    /// Employee e-mail.
    pub email: String,
    /// Employee name.
    pub full_name: String,
    /// Whether the membership occupies a seat.
    pub is_active: bool,
    /// Sessions granted.
    pub sessions_allocated: i32,
    /// Sessions consumed.
    pub sessions_used: i32,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
}

/// Data required to create a membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployee {
    /// Company.
    pub company_id: Uuid,
    /// Employee user.
    pub user_id: Uuid,
    /// Initial session allocation.
    pub sessions_allocated: i32,
}
