//! Company administration and seat accounting.

pub mod service;

pub use service::{CompanyService, CreateCompanyRequest};
