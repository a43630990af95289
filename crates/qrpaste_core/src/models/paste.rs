//! Paste data model and the request/response shapes derived from it.
//!
//! The persisted [`Paste`] row carries credential material
//! (`password_hash`, `fingerprint`); API responses use the separate
//! [`SaveReceipt`] and [`PasteView`] shapes so those fields can never
//! appear on the wire.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of payload kinds accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Code,
    Image,
}

impl ContentType {
    /// All accepted content types, in the order reported to clients.
    pub const ALL: [ContentType; 3] = [ContentType::Text, ContentType::Code, ContentType::Image];

    /// Wire name of this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Image => "image",
        }
    }

    /// Parse a wire name into a content type.
    ///
    /// # Returns
    /// `None` when the value is not a member of the closed set.
    pub fn parse(value: &str) -> Option<ContentType> {
        match value {
            "text" => Some(ContentType::Text),
            "code" => Some(ContentType::Code),
            "image" => Some(ContentType::Image),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paste record persisted in the database.
///
/// Rows are immutable once inserted; the only lifecycle transitions are
/// creation and deletion (by sweep or by a read that discovers expiry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub content_type: ContentType,
    pub language: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Privacy-hashed submitter address; consumed only by rate limiting.
    pub fingerprint: Option<String>,
}

impl Paste {
    /// Whether this row is logically dead at `now`.
    ///
    /// Expiry is strict: a row whose `expires_at` equals `now` is still
    /// readable and will not be swept by `delete_expired(now)`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Compute the expiry timestamp for a paste created at `created_at`.
    pub fn expiry_for(created_at: DateTime<Utc>, expires_days: i64) -> DateTime<Utc> {
        created_at + Duration::days(expires_days)
    }
}

/// Request payload for creating a paste.
///
/// A missing `content` field deserializes to an empty string so the
/// validator can reject it with the regular taxonomy instead of a
/// framework-level decode error.
#[derive(Clone, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub content: String,
    /// Defaults to `text` when omitted; `type` is accepted as an alias.
    #[serde(alias = "type")]
    pub content_type: Option<String>,
    pub password: Option<String>,
    pub expires_days: Option<i64>,
    pub language: Option<String>,
}

// Hand-written so a logged request can never carry the raw password.
impl fmt::Debug for SaveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveRequest")
            .field("content_len", &self.content.len())
            .field("content_type", &self.content_type)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("expires_days", &self.expires_days)
            .field("language", &self.language)
            .finish()
    }
}

/// Receipt returned after a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveReceipt {
    pub id: String,
    pub url: String,
    pub qr_data: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_days: i64,
    pub size_bytes: u64,
    pub size_kb: f64,
    pub has_password: bool,
}

impl SaveReceipt {
    /// Build the receipt for a freshly inserted paste.
    pub fn new(paste: &Paste, base_url: &str, expires_days: i64) -> Self {
        let url = format!("{}/api/paste/{}", base_url, paste.id);
        Self {
            id: paste.id.clone(),
            qr_data: url.clone(),
            url,
            expires_at: paste.expires_at,
            expires_in_days: expires_days,
            size_bytes: paste.size_bytes,
            size_kb: size_kb(paste.size_bytes),
            has_password: paste.password_hash.is_some(),
        }
    }
}

/// Paste view returned by fetches; never carries credential material.
#[derive(Debug, Clone, Serialize)]
pub struct PasteView {
    pub id: String,
    pub content: String,
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expires_in_seconds: i64,
    pub expires_in_days: f64,
    pub size_kb: f64,
    pub has_password: bool,
}

impl PasteView {
    /// Project a stored row into its public view as of `now`.
    pub fn from_paste(paste: &Paste, now: DateTime<Utc>) -> Self {
        let expires_in_seconds = (paste.expires_at - now).num_seconds();
        Self {
            id: paste.id.clone(),
            content: paste.content.clone(),
            content_type: paste.content_type,
            language: paste.language.clone(),
            created_at: paste.created_at,
            expires_at: paste.expires_at,
            expires_in_seconds,
            expires_in_days: round_to(expires_in_seconds as f64 / 86_400.0, 1),
            size_kb: size_kb(paste.size_bytes),
            has_password: paste.password_hash.is_some(),
        }
    }
}

/// Size in kilobytes rounded to two decimals, as reported by the API.
pub fn size_kb(size_bytes: u64) -> f64 {
    round_to(size_bytes as f64 / 1024.0, 2)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::{size_kb, ContentType, Paste, PasteView, SaveReceipt};
    use chrono::{Duration, Utc};

    fn sample_paste(id: &str) -> Paste {
        let now = Utc::now();
        Paste {
            id: id.to_string(),
            content: "hello".to_string(),
            content_type: ContentType::Text,
            language: None,
            password_hash: None,
            created_at: now,
            expires_at: Paste::expiry_for(now, 7),
            size_bytes: 5,
            fingerprint: None,
        }
    }

    #[test]
    fn content_type_parse_round_trips_wire_names() {
        for content_type in ContentType::ALL {
            assert_eq!(
                ContentType::parse(content_type.as_str()),
                Some(content_type)
            );
        }
        assert_eq!(ContentType::parse("binary"), None);
        assert_eq!(ContentType::parse("Text"), None);
    }

    #[test]
    fn expiry_is_strictly_after_creation() {
        let paste = sample_paste("abc12345");
        assert!(paste.expires_at > paste.created_at);
        assert!(!paste.is_expired(paste.created_at));
        // The boundary instant itself is still readable.
        assert!(!paste.is_expired(paste.expires_at));
        assert!(paste.is_expired(paste.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn save_receipt_builds_shareable_url() {
        let paste = sample_paste("Zx9Qm2Lp");
        let receipt = SaveReceipt::new(&paste, "http://localhost:38422", 7);
        assert_eq!(receipt.url, "http://localhost:38422/api/paste/Zx9Qm2Lp");
        assert_eq!(receipt.qr_data, receipt.url);
        assert_eq!(receipt.expires_in_days, 7);
        assert!(!receipt.has_password);
    }

    #[test]
    fn paste_view_never_serializes_credential_fields() {
        let mut paste = sample_paste("abc12345");
        paste.password_hash = Some("$argon2id$v=19$m=19456,t=2,p=1$AAAA$BBBB".to_string());
        paste.fingerprint = Some("feedbeef".to_string());

        let view = PasteView::from_paste(&paste, paste.created_at);
        let encoded = serde_json::to_string(&view).expect("serialize view");
        assert!(!encoded.contains("argon2"));
        assert!(!encoded.contains("password_hash"));
        assert!(!encoded.contains("fingerprint"));
        assert!(encoded.contains("\"has_password\":true"));
    }

    #[test]
    fn size_kb_rounds_to_two_decimals() {
        assert_eq!(size_kb(1024), 1.0);
        assert_eq!(size_kb(1536), 1.5);
        assert_eq!(size_kb(5), 0.0);
    }
}
