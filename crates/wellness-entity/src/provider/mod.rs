//! Provider (prestador) entities and round-robin assignment.

pub mod assignment;
pub mod model;

pub use assignment::{ProviderAssignment, select_next};
pub use model::{CreateProvider, Provider, ProviderWithPillars};
