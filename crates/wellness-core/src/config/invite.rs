//! Invite code configuration.

use serde::{Deserialize, Serialize};

/// Settings applied when HR or an admin issues invite codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteConfig {
    /// Number of characters in a generated code.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Days until a new invite expires when the caller gives no expiry.
    /// `0` issues invites that never expire.
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: u32,
    /// Sessions granted to the membership created on redemption when the
    /// caller gives no explicit allocation.
    #[serde(default = "default_sessions")]
    pub default_sessions: i32,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            default_expiry_days: default_expiry_days(),
            default_sessions: default_sessions(),
        }
    }
}

fn default_code_length() -> usize {
    8
}

fn default_expiry_days() -> u32 {
    30
}

fn default_sessions() -> i32 {
    0
}
