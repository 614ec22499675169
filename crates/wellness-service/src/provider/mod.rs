//! Provider administration and round-robin assignment.

pub mod service;

pub use service::{CreateProviderRequest, ProviderService};
