//! Core domain library for QRPaste (validation, storage, paste lifecycle).

/// Password hashing and submitter fingerprinting.
pub mod auth;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Application error types (validation/domain/storage).
pub mod error;
/// Short identifier allocation.
pub mod ident;
/// Data models for persisted pastes and API payloads.
pub mod models;
/// Sliding-window submission limits.
pub mod ratelimit;
/// Expired-row sweeping and maintenance reporting.
pub mod sweep;
/// Submission validation and normalization.
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::{AppError, ValidationError};
