//! Wellness pillar enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four wellness categories providers and bookings belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pillar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    /// Psychological support.
    MentalHealth,
    /// Physical wellbeing (nutrition, physiotherapy, fitness).
    PhysicalWellness,
    /// Financial counselling.
    FinancialAssistance,
    /// Legal counselling.
    LegalAssistance,
}

impl Pillar {
    /// All pillars in display order.
    pub const ALL: [Pillar; 4] = [
        Self::MentalHealth,
        Self::PhysicalWellness,
        Self::FinancialAssistance,
        Self::LegalAssistance,
    ];

    /// Return the pillar as its snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MentalHealth => "mental_health",
            Self::PhysicalWellness => "physical_wellness",
            Self::FinancialAssistance => "financial_assistance",
            Self::LegalAssistance => "legal_assistance",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Pillar {
    type Err = wellness_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mental_health" | "mental" => Ok(Self::MentalHealth),
            "physical_wellness" | "physical" => Ok(Self::PhysicalWellness),
            "financial_assistance" | "financial" => Ok(Self::FinancialAssistance),
            "legal_assistance" | "legal" => Ok(Self::LegalAssistance),
            _ => Err(wellness_core::AppError::validation(format!(
                "Invalid pillar: '{s}'. Expected one of: mental_health, physical_wellness, \
                 financial_assistance, legal_assistance"
            ))),
        }
    }
}
