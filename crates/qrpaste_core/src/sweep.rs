//! Expired-row sweeping and maintenance reporting.
//!
//! The sweep runs in two modes: a cheap opportunistic pass after every
//! save, and a full pass (with statistics, and optionally a storage
//! reclaim) behind the privileged cleanup operation. Both commute with
//! concurrent saves and fetches; deletion is a conditional batch remove
//! over atomic single-row operations.

use crate::db::paste::TypeStats;
use crate::db::Database;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one full cleanup pass.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub deleted_count: u64,
    pub active_count: u64,
    pub stats: Vec<TypeStats>,
    pub db_size_bytes: u64,
    pub reclaimed: bool,
    pub elapsed_ms: u64,
}

/// Delete expired rows and gather post-cleanup statistics.
///
/// `reclaim` additionally flushes pending writes so the reported size
/// reflects disk state; it is only honored on explicit request because
/// it is I/O-heavy relative to the sweep itself.
///
/// # Errors
/// Returns an error if the sweep or any statistics query fails.
pub fn run(db: &Database, now: DateTime<Utc>, reclaim: bool) -> Result<CleanupReport, AppError> {
    let started = std::time::Instant::now();

    let deleted_count = db.pastes.delete_expired(now)?;
    let active_count = db.pastes.count_active(now)?;
    let stats = db.pastes.stats_by_type(now)?;

    let reclaimed = if reclaim {
        db.flush()?;
        true
    } else {
        false
    };
    let db_size_bytes = db.size_on_disk()?;

    let report = CleanupReport {
        deleted_count,
        active_count,
        stats,
        db_size_bytes,
        reclaimed,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    tracing::info!(
        "Cleanup: deleted {}, active {}, {} bytes on disk ({} ms)",
        report.deleted_count,
        report.active_count,
        report.db_size_bytes,
        report.elapsed_ms
    );
    Ok(report)
}

/// Cheap post-save sweep; failures are logged, never fatal to the save.
pub fn run_opportunistic(db: &Database, now: DateTime<Utc>) {
    if let Err(err) = db.pastes.delete_expired(now) {
        tracing::warn!("Opportunistic cleanup failed: {}", err);
    }
}
