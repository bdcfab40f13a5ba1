//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// SECRET CODES
// =============================================================================

/// Length of a room invitation code (base62, ~190 bits of entropy)
pub const INVITATION_CODE_LENGTH: usize = 32;

/// Length of a participant access code (base62, ~190 bits of entropy)
pub const ACCESS_CODE_LENGTH: usize = 32;

// =============================================================================
// DRAW SETTINGS
// =============================================================================

/// Minimum number of participants required before names can be drawn
pub const MIN_DRAW_PARTICIPANTS: usize = 3;

/// Maximum resampling attempts before the draw is abandoned.
/// The expected attempt count is ~e, so hitting this cap means the
/// random source is misbehaving.
pub const MAX_DRAW_ATTEMPTS: usize = 1000;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum room name length
pub const MAX_ROOM_NAME_LENGTH: u64 = 100;

/// Maximum participant name length (first or last)
pub const MAX_PARTICIPANT_NAME_LENGTH: u64 = 50;

/// Maximum wishlist length
pub const MAX_WISHLIST_LENGTH: u64 = 1000;

/// Maximum delivery info length
pub const MAX_DELIVERY_INFO_LENGTH: u64 = 500;

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
