//! Application error types for validation, domain logic, and storage.

use crate::models::paste::ContentType;
use crate::ratelimit::RateWindow;
use thiserror::Error;

/// Rejection reason produced by submission validation.
///
/// Each variant carries a human-readable message (the `Display` impl) that
/// is safe to show verbatim, plus a stable machine code via [`Self::code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Content is required")]
    EmptyContent,

    #[error("Invalid content type '{0}'. Allowed: text, code, image")]
    InvalidContentType(String),

    #[error("Content too large: {size} bytes exceeds the {limit} byte limit for {content_type}")]
    ContentTooLarge {
        content_type: ContentType,
        size: u64,
        limit: u64,
    },

    #[error("Password must be {min}-{max} characters")]
    InvalidPassword { min: usize, max: usize },

    #[error("Expiry must be between {min}-{max} days")]
    InvalidExpiration { min: i64, max: i64 },

    #[error("Invalid image format. Expected a base64 data URL")]
    InvalidImageFormat,

    #[error("Invalid base64 encoding")]
    InvalidBase64,

    #[error("Unsupported image type. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedImageType,

    #[error("Invalid programming language '{0}'")]
    InvalidLanguage(String),
}

impl ValidationError {
    /// Stable machine-readable reason code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyContent => "invalid_request",
            Self::InvalidContentType(_) => "invalid_content_type",
            Self::ContentTooLarge { .. } => "content_too_large",
            Self::InvalidPassword { .. } => "invalid_password",
            Self::InvalidExpiration { .. } => "invalid_expiration",
            Self::InvalidImageFormat | Self::InvalidBase64 | Self::UnsupportedImageType => {
                "invalid_image_format"
            }
            Self::InvalidLanguage(_) => "invalid_language",
        }
    }
}

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Rate limit exceeded: more than {cap} submissions per {window}")]
    RateLimited { window: RateWindow, cap: u64 },

    // Unauthorized and Forbidden intentionally share one message: denial
    // responses must not confirm that a protected paste exists.
    #[error("Access denied")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Paste not found")]
    NotFound,

    #[error("Paste has expired")]
    Expired,

    #[error("Identifier collision on insert: {0}")]
    IdCollision(String),

    #[error("Identifier space exhausted at length {0}")]
    IdSpaceExhausted(usize),

    #[error("Password hashing failed")]
    PasswordHash,

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),
}

impl AppError {
    /// Stable machine-readable reason code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::RateLimited { .. } => "rate_limited",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::IdCollision(_)
            | Self::IdSpaceExhausted(_)
            | Self::PasswordHash
            | Self::Database(_)
            | Self::Serialization(_)
            | Self::StorageMessage(_) => "storage_error",
        }
    }

    /// Whether the detailed message may be echoed to the client.
    ///
    /// Storage-class failures are logged server-side and replaced with a
    /// generic message at the HTTP boundary.
    pub fn is_client_safe(&self) -> bool {
        !matches!(self.code(), "storage_error")
    }
}
