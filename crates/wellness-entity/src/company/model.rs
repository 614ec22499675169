//! Company entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::balance::SessionBalance;

/// A client company that buys seats and a session pool for its employees.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    /// Unique company identifier.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Maximum number of concurrently active employee accounts.
    pub seat_limit: i32,
    /// Sessions in the company-wide pool.
    pub sessions_allocated: i32,
    /// Sessions consumed from the pool.
    pub sessions_used: i32,
    /// Whether the contract is active.
    pub is_active: bool,
    /// When the company was created.
    pub created_at: DateTime<Utc>,
    /// When the company was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Session balance of the company-wide pool.
    pub fn session_balance(&self) -> SessionBalance {
        SessionBalance::new(self.sessions_allocated, self.sessions_used)
    }
}

/// Data required to create a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    /// Company name.
    pub name: String,
    /// Initial seat limit.
    pub seat_limit: i32,
    /// Initial session pool.
    pub sessions_allocated: i32,
}
