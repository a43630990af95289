//! Shared constants used across QRPaste crates.

/// Default API port for QRPaste.
pub const DEFAULT_PORT: u16 = 38422;

/// Default maximum size for plain text pastes.
pub const DEFAULT_MAX_TEXT_SIZE: u64 = 5 * 1024 * 1024;

/// Default maximum size for code pastes.
pub const DEFAULT_MAX_CODE_SIZE: u64 = 2 * 1024 * 1024;

/// Default maximum size for base64 data-URL image pastes, measured on the
/// raw submitted string (base64 overhead included).
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 10 * 1024 * 1024;

/// Default length of newly allocated paste identifiers.
pub const DEFAULT_ID_LENGTH: usize = 8;

/// Password length bounds, in bytes of the submitted string.
pub const PASSWORD_MIN_LENGTH: usize = 4;
/// Upper password length bound.
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Expiration bounds and default, in days.
pub const MIN_EXPIRY_DAYS: i64 = 1;
/// Longest allowed retention.
pub const MAX_EXPIRY_DAYS: i64 = 30;
/// Retention applied when the request omits `expires_days`.
pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Submission caps per fingerprint and sliding window.
pub const DEFAULT_RATE_PER_MINUTE: u64 = 5;
/// Hourly submission cap.
pub const DEFAULT_RATE_PER_HOUR: u64 = 20;
/// Daily submission cap.
pub const DEFAULT_RATE_PER_DAY: u64 = 50;

/// Fallback fingerprint salt for development; production deployments must
/// set `QRPASTE_SECRET`.
pub const DEV_FALLBACK_SECRET: &str = "change_me_in_production";
