//! # wellness-core
//!
//! Core crate for the wellness platform. Contains configuration schemas,
//! pagination types, and the unified error system with its HTTP mapping.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod http;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
