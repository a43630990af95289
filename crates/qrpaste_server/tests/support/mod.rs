//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use qrpaste_server::{create_app, AppState, Config, Database};
use qrpaste_server::config::{ExpiryPolicy, Limits, RateCaps};
use std::path::Path;
use tempfile::TempDir;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        public_base_url: Some("http://paste.test".to_string()),
        id_length: 8,
        limits: Limits {
            max_text_size: 5 * 1024 * 1024,
            max_code_size: 2 * 1024 * 1024,
            max_image_size: 10 * 1024 * 1024,
            password_min_length: 4,
            password_max_length: 100,
        },
        rate_caps: RateCaps {
            per_minute: 0,
            per_hour: 0,
            per_day: 0,
        },
        expiry: ExpiryPolicy {
            min_days: 1,
            max_days: 30,
            default_days: 7,
        },
        secret: "integration-test-secret".to_string(),
        cleanup_token: Some("test-cleanup-token".to_string()),
    }
}

pub(crate) fn test_server_for_config(config: Config) -> (TestServer, AppState) {
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db);
    let app = create_app(state.clone(), false);
    let server = TestServer::new(app).expect("server");
    (server, state)
}

/// Spin up a server with rate limiting disabled (caps 0) so unrelated
/// tests never trip the shared-fingerprint windows.
pub(crate) fn setup_test_server() -> (TestServer, TempDir, AppState) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = test_config_for_db_path(&db_path);
    let (server, state) = test_server_for_config(config);
    (server, temp_dir, state)
}
