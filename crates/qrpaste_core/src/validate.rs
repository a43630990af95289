//! Submission validation and normalization.
//!
//! Pure functions over configuration values; no I/O. A submission either
//! normalizes into a [`Submission`] ready for storage or fails with a
//! single [`ValidationError`], never partial success.

use crate::config::{ExpiryPolicy, Limits};
use crate::error::ValidationError;
use crate::models::paste::{ContentType, SaveRequest};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::ImageFormat;

/// Languages accepted on `code` pastes.
pub const CODE_LANGUAGES: &[&str] = &[
    "javascript",
    "python",
    "php",
    "java",
    "cpp",
    "csharp",
    "html",
    "css",
    "sql",
    "json",
    "xml",
];

/// Normalized submission produced by a successful validation pass.
#[derive(Clone)]
pub struct Submission {
    pub content: String,
    pub content_type: ContentType,
    pub password: Option<String>,
    pub expires_days: i64,
    pub language: Option<String>,
    pub size_bytes: u64,
}

// Hand-written so a logged submission can never carry the raw password.
impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submission")
            .field("content_type", &self.content_type)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("expires_days", &self.expires_days)
            .field("language", &self.language)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

/// Validate a raw save request against the configured policy.
///
/// # Returns
/// A [`Submission`] ready for storage.
///
/// # Errors
/// The first [`ValidationError`] encountered, in the same order the
/// checks are listed in the module docs: content, type, size, image
/// payload, password, expiration, language.
pub fn validate(
    request: SaveRequest,
    limits: &Limits,
    expiry: &ExpiryPolicy,
) -> Result<Submission, ValidationError> {
    if request.content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }

    let content_type = match request.content_type.as_deref() {
        None => ContentType::Text,
        Some(raw) => ContentType::parse(raw)
            .ok_or_else(|| ValidationError::InvalidContentType(raw.to_string()))?,
    };

    // Size is checked on the raw submitted bytes before any decoding so
    // oversized images never pay the base64 cost.
    let size_bytes = request.content.len() as u64;
    let limit = limits.max_size_for(content_type);
    if size_bytes > limit {
        return Err(ValidationError::ContentTooLarge {
            content_type,
            size: size_bytes,
            limit,
        });
    }

    if content_type == ContentType::Image {
        validate_image_data_url(&request.content)?;
    }

    let password = normalize_password(request.password.as_deref(), limits)?;
    let expires_days = validate_expiry_days(request.expires_days, expiry)?;
    let language = validate_language(request.language.as_deref(), content_type)?;

    Ok(Submission {
        content: request.content,
        content_type,
        password,
        expires_days,
        language,
        size_bytes,
    })
}

/// Normalize an optional password.
///
/// A missing or whitespace-only password means "no password"; anything
/// else must fall within the configured length bounds (byte length of
/// the submitted string).
fn normalize_password(
    raw: Option<&str>,
    limits: &Limits,
) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let len = raw.len();
    if len < limits.password_min_length || len > limits.password_max_length {
        return Err(ValidationError::InvalidPassword {
            min: limits.password_min_length,
            max: limits.password_max_length,
        });
    }
    Ok(Some(raw.to_string()))
}

/// Validate the expiration, applying the default when omitted.
///
/// Out-of-range values are rejected, not clamped.
fn validate_expiry_days(
    days: Option<i64>,
    policy: &ExpiryPolicy,
) -> Result<i64, ValidationError> {
    let days = days.unwrap_or(policy.default_days);
    if days < policy.min_days || days > policy.max_days {
        return Err(ValidationError::InvalidExpiration {
            min: policy.min_days,
            max: policy.max_days,
        });
    }
    Ok(days)
}

/// Validate an optional language tag.
///
/// The tag is only meaningful for `code`; on other types it is silently
/// dropped. Matching is case-insensitive against [`CODE_LANGUAGES`].
fn validate_language(
    raw: Option<&str>,
    content_type: ContentType,
) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || content_type != ContentType::Code {
        return Ok(None);
    }
    let lower = trimmed.to_ascii_lowercase();
    if CODE_LANGUAGES.contains(&lower.as_str()) {
        Ok(Some(lower))
    } else {
        Err(ValidationError::InvalidLanguage(trimmed.to_string()))
    }
}

/// Validate an image submission as a base64 data URL.
///
/// The declared prefix must name an allowed type (`jpg` is accepted as
/// an alias of `jpeg`), the payload must decode as base64, and the
/// decoded bytes must sniff as one of the allowed formats. Sniffing
/// guards against mislabeled payloads; the prefix alone is not trusted.
fn validate_image_data_url(content: &str) -> Result<(), ValidationError> {
    let rest = content
        .strip_prefix("data:image/")
        .ok_or(ValidationError::InvalidImageFormat)?;
    let (declared, payload) = rest
        .split_once(";base64,")
        .ok_or(ValidationError::InvalidImageFormat)?;

    let declared = declared.to_ascii_lowercase();
    if !matches!(declared.as_str(), "jpeg" | "jpg" | "png" | "gif" | "webp") {
        return Err(ValidationError::UnsupportedImageType);
    }

    let decoded = BASE64
        .decode(payload)
        .map_err(|_| ValidationError::InvalidBase64)?;

    match image::guess_format(&decoded) {
        Ok(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP) => Ok(()),
        _ => Err(ValidationError::UnsupportedImageType),
    }
}
