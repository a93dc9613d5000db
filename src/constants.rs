//! Shared numeric constants for the gesture engine.

/// Maximum scale used until an explicit limit or the natural-image ratio is known.
pub const DEFAULT_MAX_SCALE: f64 = 3.0;

/// Minimum interval between natural-image-size checks, in milliseconds.
pub const NATURAL_SIZE_POLL_INTERVAL_MS: u64 = 10;
