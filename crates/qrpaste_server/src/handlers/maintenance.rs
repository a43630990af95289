//! Privileged cleanup endpoint and public service info.

use super::success;
use crate::{error::HttpError, AppState};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use qrpaste_core::{sweep, AppError};
use serde::Deserialize;
use serde_json::Value;

/// Header carrying the cleanup token.
pub const CLEANUP_TOKEN_HEADER: &str = "x-cleanup-token";

/// Query parameters for the cleanup endpoint.
#[derive(Debug, Deserialize)]
pub struct CleanupQuery {
    pub token: Option<String>,
    pub reclaim: Option<bool>,
}

/// Run a full cleanup pass.
///
/// Requires the configured cleanup token, supplied via the
/// `x-cleanup-token` header or the `token` query parameter. With no
/// token configured the endpoint stays closed.
///
/// # Errors
/// Access denial on a missing or wrong token; storage errors otherwise.
pub async fn run_cleanup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CleanupQuery>,
) -> Result<Json<Value>, HttpError> {
    let Some(expected) = state.config.cleanup_token.as_deref() else {
        return Err(AppError::Forbidden.into());
    };
    let supplied = headers
        .get(CLEANUP_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or(query.token);
    if supplied.as_deref() != Some(expected) {
        return Err(AppError::Forbidden.into());
    }

    let report = sweep::run(&state.db, Utc::now(), query.reclaim.unwrap_or(false))?;
    Ok(success(report))
}

/// Public service info: endpoints and size limits.
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    let limits = &state.config.limits;
    success(serde_json::json!({
        "name": "QRPaste API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "save": "POST /api/paste",
            "get": "GET /api/paste/:id",
            "cleanup": "POST /api/cleanup",
        },
        "limits": {
            "text": format_mb(limits.max_text_size),
            "code": format_mb(limits.max_code_size),
            "image": format_mb(limits.max_image_size),
        },
    }))
}

fn format_mb(bytes: u64) -> String {
    format!("{} MB", bytes / (1024 * 1024))
}

#[cfg(test)]
mod tests {
    use super::format_mb;

    #[test]
    fn limits_render_in_whole_megabytes() {
        assert_eq!(format_mb(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_mb(10 * 1024 * 1024), "10 MB");
    }
}
