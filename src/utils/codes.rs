//! Secret code generation
//!
//! Invitation and access codes are the only credentials in the system, so
//! they must be unguessable: fixed-length base62 tokens drawn from the
//! thread-local CSPRNG. Entropy-source failure panics and is never retried.

use rand::Rng;

use crate::constants::{ACCESS_CODE_LENGTH, INVITATION_CODE_LENGTH};

/// Generate a cryptographically secure random token
pub fn generate_secure_token(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generate a fresh room invitation code
pub fn new_invitation_code() -> String {
    generate_secure_token(INVITATION_CODE_LENGTH)
}

/// Generate a fresh participant access code
pub fn new_access_code() -> String {
    generate_secure_token(ACCESS_CODE_LENGTH)
}
