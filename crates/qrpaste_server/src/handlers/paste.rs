//! Paste HTTP handlers: save and fetch.

use super::success;
use crate::{error::HttpError, AppState};
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use qrpaste_core::models::paste::{Paste, PasteView, SaveReceipt, SaveRequest};
use qrpaste_core::{auth, ident, sweep, validate, AppError};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// Query parameters for fetching a paste.
#[derive(Debug, Deserialize)]
pub struct GetQuery {
    pub password: Option<String>,
}

/// Resolve the client address for fingerprinting.
///
/// Proxy headers win over the socket peer, first `X-Forwarded-For` entry
/// before `X-Real-Ip`; unparsable values fall through so a client cannot
/// smuggle arbitrary strings into the fingerprint input.
fn client_addr(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let candidate = first.trim();
            if candidate.parse::<IpAddr>().is_ok() {
                return candidate.to_string();
            }
        }
    }
    if let Some(real) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let candidate = real.trim();
        if candidate.parse::<IpAddr>().is_ok() {
            return candidate.to_string();
        }
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "0.0.0.0".to_string())
}

/// Create a new paste.
///
/// Validation → rate limiting → identifier allocation → insert, then an
/// opportunistic sweep of expired rows.
///
/// # Errors
/// Returns an error if validation, rate limiting, or persistence fails.
pub async fn save_paste(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<SaveRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let submission = validate::validate(request, &state.config.limits, &state.config.expiry)?;

    let now = Utc::now();
    let fingerprint = auth::fingerprint(
        &state.config.secret,
        &client_addr(&headers, connect.map(|info| info.0)),
    );
    state.limiter.check(&state.db.pastes, &fingerprint, now)?;

    let id = ident::allocate(state.config.id_length, |candidate| {
        state.db.pastes.contains(candidate)
    })?;
    let password_hash = submission
        .password
        .as_deref()
        .map(auth::hash_password)
        .transpose()?;

    let paste = Paste {
        id,
        content: submission.content,
        content_type: submission.content_type,
        language: submission.language,
        password_hash,
        created_at: now,
        expires_at: Paste::expiry_for(now, submission.expires_days),
        size_bytes: submission.size_bytes,
        fingerprint: Some(fingerprint),
    };
    state.db.pastes.insert(&paste)?;

    sweep::run_opportunistic(&state.db, now);

    let receipt = SaveReceipt::new(&paste, &state.config.base_url(), submission.expires_days);
    Ok((StatusCode::CREATED, success(receipt)))
}

/// Fetch a paste by id.
///
/// Storage lookup, then the expiration check (with opportunistic removal
/// of a dead row), then the password gate.
///
/// # Errors
/// Returns not-found, expired, or an access denial; storage failures are
/// fatal to the request.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let now = Utc::now();
    let paste = state.db.pastes.get(&id)?.ok_or(AppError::NotFound)?;

    if paste.is_expired(now) {
        // The row is logically dead either way; removal is best-effort.
        if let Err(err) = state.db.pastes.remove(&id) {
            tracing::warn!("Failed to drop expired paste {}: {}", id, err);
        }
        return Err(AppError::Expired.into());
    }

    auth::authorize_fetch(paste.password_hash.as_deref(), query.password.as_deref())?;

    Ok(success(PasteView::from_paste(&paste, now)))
}
