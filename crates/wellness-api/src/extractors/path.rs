//! Typed path parameter helpers.

use wellness_core::error::AppError;
use wellness_entity::Pillar;

/// Parse a pillar from a path segment such as `mental_health` or `legal`.
pub fn parse_pillar(s: &str) -> Result<Pillar, AppError> {
    s.parse()
}
