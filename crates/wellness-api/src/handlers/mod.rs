//! HTTP request handlers.

pub mod auth;
pub mod balance;
pub mod booking;
pub mod company;
pub mod employee;
pub mod health;
pub mod invite;
pub mod provider;
pub mod user;
