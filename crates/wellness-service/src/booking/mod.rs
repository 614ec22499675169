//! Booking consultations against session balances.

pub mod service;

pub use service::{BookSessionRequest, BookingService};
