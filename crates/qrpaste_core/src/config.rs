//! Configuration loading from environment variables.

use crate::constants::*;
use crate::models::paste::ContentType;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Per-type size ceilings and password bounds used by the validator.
#[derive(Debug, Clone, Deserialize)]
pub struct Limits {
    pub max_text_size: u64,
    pub max_code_size: u64,
    pub max_image_size: u64,
    pub password_min_length: usize,
    pub password_max_length: usize,
}

impl Limits {
    /// Size ceiling for one content type, in raw submitted bytes.
    pub fn max_size_for(&self, content_type: ContentType) -> u64 {
        match content_type {
            ContentType::Text => self.max_text_size,
            ContentType::Code => self.max_code_size,
            ContentType::Image => self.max_image_size,
        }
    }
}

/// Submission caps per sliding window; a cap of 0 disables that window.
#[derive(Debug, Clone, Deserialize)]
pub struct RateCaps {
    pub per_minute: u64,
    pub per_hour: u64,
    pub per_day: u64,
}

/// Allowed expiration range and the default applied when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpiryPolicy {
    pub min_days: i64,
    pub max_days: i64,
    pub default_days: i64,
}

/// Runtime configuration for QRPaste.
///
/// Assembled once at process start and passed explicitly into each
/// component; validation logic never reads the environment itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub public_base_url: Option<String>,
    pub id_length: usize,
    pub limits: Limits,
    pub rate_caps: RateCaps,
    pub expiry: ExpiryPolicy,
    pub secret: String,
    pub cleanup_token: Option<String>,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn env_nonempty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").map(expand_tilde).unwrap_or_else(|_| {
                let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                let cache_dir = home.join(".cache").join("qrpaste");
                cache_dir.join("db").to_string_lossy().to_string()
            }),
            port: env_parsed("PORT", DEFAULT_PORT),
            public_base_url: env_nonempty("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            id_length: env_parsed("ID_LENGTH", DEFAULT_ID_LENGTH),
            limits: Limits {
                max_text_size: env_parsed("MAX_TEXT_SIZE", DEFAULT_MAX_TEXT_SIZE),
                max_code_size: env_parsed("MAX_CODE_SIZE", DEFAULT_MAX_CODE_SIZE),
                max_image_size: env_parsed("MAX_IMAGE_SIZE", DEFAULT_MAX_IMAGE_SIZE),
                password_min_length: PASSWORD_MIN_LENGTH,
                password_max_length: PASSWORD_MAX_LENGTH,
            },
            rate_caps: RateCaps {
                per_minute: env_parsed("RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_PER_MINUTE),
                per_hour: env_parsed("RATE_LIMIT_PER_HOUR", DEFAULT_RATE_PER_HOUR),
                per_day: env_parsed("RATE_LIMIT_PER_DAY", DEFAULT_RATE_PER_DAY),
            },
            expiry: ExpiryPolicy {
                min_days: MIN_EXPIRY_DAYS,
                max_days: MAX_EXPIRY_DAYS,
                default_days: env_parsed("DEFAULT_EXPIRY_DAYS", DEFAULT_EXPIRY_DAYS),
            },
            secret: env_nonempty("QRPASTE_SECRET")
                .unwrap_or_else(|| DEV_FALLBACK_SECRET.to_string()),
            cleanup_token: env_nonempty("CLEANUP_TOKEN"),
        }
    }

    /// Base URL used when building shareable paste links.
    pub fn base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Whether the fingerprint secret is still the development fallback.
    pub fn secret_is_default(&self) -> bool {
        self.secret == DEV_FALLBACK_SECRET
    }
}
