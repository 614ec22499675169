//! Login and token refresh.

pub mod service;

pub use service::{AuthService, LoginResponse};
