//! Application role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the RBAC system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "app_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    /// Platform administrator.
    Admin,
    /// Company-side administrator managing employees, seats and quotas.
    Hr,
    /// Service provider delivering sessions.
    Prestador,
    /// Specialist triaging employees and routing bookings.
    Specialist,
    /// Employee consuming sessions.
    User,
}

impl AppRole {
    /// Check if this role is the platform admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role manages a company (HR) or the whole platform.
    pub fn is_company_manager(&self) -> bool {
        matches!(self, Self::Admin | Self::Hr)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Hr => "hr",
            Self::Prestador => "prestador",
            Self::Specialist => "specialist",
            Self::User => "user",
        }
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppRole {
    type Err = wellness_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "hr" => Ok(Self::Hr),
            "prestador" | "provider" => Ok(Self::Prestador),
            "specialist" => Ok(Self::Specialist),
            "user" | "employee" => Ok(Self::User),
            _ => Err(wellness_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, hr, prestador, specialist, user"
            ))),
        }
    }
}
