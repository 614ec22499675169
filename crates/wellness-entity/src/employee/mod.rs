//! Employee membership entities.

pub mod model;

pub use model::{CreateEmployee, Employee, EmployeeProfile};
