//! Data models for persisted pastes and API payloads.

/// Paste record and request/response shapes.
pub mod paste;
