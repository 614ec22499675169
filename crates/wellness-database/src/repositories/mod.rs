//! Repository implementations for all wellness entities.

pub mod assignment;
pub mod booking;
pub mod company;
pub mod employee;
pub mod invite;
pub mod provider;
pub mod user;

pub use assignment::AssignmentRepository;
pub use booking::BookingRepository;
pub use company::CompanyRepository;
pub use employee::EmployeeRepository;
pub use invite::{InviteRepository, Redemption};
pub use provider::ProviderRepository;
pub use user::UserRepository;

use wellness_core::error::{AppError, ErrorKind};

/// Build a `map_err` closure that wraps a sqlx error as a database error.
/// An exhausted pool is reported as unavailable instead.
pub(crate) fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let kind = match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::Database,
        };
        AppError::with_source(kind, message, e)
    }
}

/// Whether the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
