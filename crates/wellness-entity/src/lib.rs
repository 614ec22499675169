//! # wellness-entity
//!
//! Domain entity models for the wellness platform. Every struct in this
//! crate represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.
//!
//! The accounting and assignment rules live here as plain functions and
//! methods so they can be exercised without a database:
//!
//! - [`balance::SessionBalance`]: remaining sessions, never negative
//! - [`company::SeatSummary`] / [`company::validate_seat_limit`]: seat accounting
//! - [`provider::select_next`]: round-robin provider choice
//! - [`invite::Invite::check_redeemable`]: invite lifecycle checks

pub mod balance;
pub mod booking;
pub mod company;
pub mod employee;
pub mod invite;
pub mod pillar;
pub mod provider;
pub mod user;

pub use pillar::Pillar;
