//! Invite code generation.

use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Shortest code ever generated, whatever the configuration says.
pub const MIN_CODE_LENGTH: usize = 4;

/// Generate a random upper-case alphanumeric code.
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len.max(MIN_CODE_LENGTH))
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
