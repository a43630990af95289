//! Shared test-only helpers for qrpaste_core.

use crate::config::{Config, ExpiryPolicy, Limits, RateCaps};
use crate::constants::*;
use crate::Database;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Builds a default-policy configuration pointing at `db_path`.
pub(crate) fn test_config(db_path: &str) -> Config {
    Config {
        db_path: db_path.to_string(),
        port: 0,
        public_base_url: None,
        id_length: DEFAULT_ID_LENGTH,
        limits: Limits {
            max_text_size: DEFAULT_MAX_TEXT_SIZE,
            max_code_size: DEFAULT_MAX_CODE_SIZE,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            password_min_length: PASSWORD_MIN_LENGTH,
            password_max_length: PASSWORD_MAX_LENGTH,
        },
        rate_caps: RateCaps {
            per_minute: DEFAULT_RATE_PER_MINUTE,
            per_hour: DEFAULT_RATE_PER_HOUR,
            per_day: DEFAULT_RATE_PER_DAY,
        },
        expiry: ExpiryPolicy {
            min_days: MIN_EXPIRY_DAYS,
            max_days: MAX_EXPIRY_DAYS,
            default_days: DEFAULT_EXPIRY_DAYS,
        },
        secret: "test-secret".to_string(),
        cleanup_token: None,
    }
}
