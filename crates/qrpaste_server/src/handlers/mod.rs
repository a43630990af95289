//! HTTP handlers for the QRPaste API.

/// Privileged cleanup and public service info.
pub mod maintenance;
/// Paste save/fetch endpoints.
pub mod paste;

use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Wrap response data in the success envelope.
pub(crate) fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(serde_json::json!({ "success": true, "data": data }))
}
