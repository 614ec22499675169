//! # wellness-database
//!
//! PostgreSQL connection management and repository implementations for
//! the wellness platform.
//!
//! Multi-step business operations (invite redemption, provider assignment,
//! seat limit changes, booking) run as single transactions here so that
//! concurrent callers see either all of their effects or none.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
