//! Utility functions

pub mod codes;

pub use codes::{generate_secure_token, new_access_code, new_invitation_code};
