//! Employee membership management.

pub mod service;

pub use service::EmployeeService;
