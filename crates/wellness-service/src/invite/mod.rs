//! Invite issuance and redemption.

pub mod code;
pub mod service;

pub use code::generate_code;
pub use service::{CreateInviteRequest, InviteService};
