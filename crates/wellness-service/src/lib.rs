//! # wellness-service
//!
//! Use-case services for the wellness platform. Each service checks the
//! caller's permissions, applies domain rules and delegates persistence
//! to the repositories.
//!
//! Services follow constructor injection: every dependency is passed in
//! as an `Arc` when the service is built.

pub mod auth;
pub mod balance;
pub mod booking;
pub mod company;
pub mod context;
pub mod employee;
pub mod invite;
pub mod provider;
pub mod user;

pub use auth::AuthService;
pub use balance::BalanceService;
pub use booking::BookingService;
pub use company::CompanyService;
pub use context::RequestContext;
pub use employee::EmployeeService;
pub use invite::InviteService;
pub use provider::ProviderService;
pub use user::UserService;
