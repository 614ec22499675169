//! Session balance queries.

pub mod service;

pub use service::BalanceService;
