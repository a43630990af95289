//! Sliding-window submission limits derived from persisted rows.
//!
//! Counting reads the submitter index written at insert time, so the
//! limiter is inherently consistent with what was actually stored; there
//! is no separate counter state to drift. A failing count fails OPEN:
//! availability wins over strict limiting.

use crate::config::RateCaps;
use crate::db::paste::PasteDb;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Window that tripped a rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateWindow {
    Minute,
    Hour,
    Day,
}

impl RateWindow {
    /// Length of this window.
    pub fn duration(&self) -> Duration {
        match self {
            RateWindow::Minute => Duration::minutes(1),
            RateWindow::Hour => Duration::hours(1),
            RateWindow::Day => Duration::days(1),
        }
    }

    /// Wire name of this window.
    pub fn as_str(&self) -> &'static str {
        match self {
            RateWindow::Minute => "minute",
            RateWindow::Hour => "hour",
            RateWindow::Day => "day",
        }
    }
}

impl fmt::Display for RateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-fingerprint submission limiter over the configured windows.
pub struct RateLimiter {
    caps: RateCaps,
}

impl RateLimiter {
    /// Build a limiter from configured caps.
    pub fn new(caps: RateCaps) -> Self {
        Self { caps }
    }

    /// Check every window for `fingerprint` as of `now`.
    ///
    /// Windows are checked shortest-first so the error names the
    /// tightest window that tripped. A cap of 0 disables its window.
    ///
    /// # Errors
    /// [`AppError::RateLimited`] naming the window that tripped. Storage
    /// failures during counting are logged and admit the request.
    pub fn check(
        &self,
        pastes: &PasteDb,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let windows = [
            (RateWindow::Minute, self.caps.per_minute),
            (RateWindow::Hour, self.caps.per_hour),
            (RateWindow::Day, self.caps.per_day),
        ];
        for (window, cap) in windows {
            if cap == 0 {
                continue;
            }
            let since = now - window.duration();
            match pastes.count_submissions_since(fingerprint, since) {
                Ok(count) if count >= cap => {
                    return Err(AppError::RateLimited { window, cap });
                }
                Ok(_) => {}
                Err(err) => {
                    // Fail open: a broken counting query must not block saves.
                    tracing::warn!("Rate limit check failed ({} window): {}", window, err);
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RateLimiter, RateWindow};
    use crate::config::RateCaps;
    use crate::error::AppError;
    use crate::models::paste::{ContentType, Paste};
    use crate::test_support::setup_temp_db;
    use chrono::{DateTime, Duration, Utc};

    fn submission(id: &str, fingerprint: &str, created_at: DateTime<Utc>) -> Paste {
        Paste {
            id: id.to_string(),
            content: "payload".to_string(),
            content_type: ContentType::Text,
            language: None,
            password_hash: None,
            created_at,
            expires_at: Paste::expiry_for(created_at, 7),
            size_bytes: 7,
            fingerprint: Some(fingerprint.to_string()),
        }
    }

    fn caps(per_minute: u64, per_hour: u64, per_day: u64) -> RateCaps {
        RateCaps {
            per_minute,
            per_hour,
            per_day,
        }
    }

    #[test]
    fn under_cap_submissions_pass() {
        let (db, _dir) = setup_temp_db();
        let now = Utc::now();
        let fp = "aa".repeat(32);
        for i in 0..2 {
            db.pastes
                .insert(&submission(
                    &format!("under{:03}", i),
                    &fp,
                    now - Duration::seconds(10 + i),
                ))
                .expect("insert");
        }

        let limiter = RateLimiter::new(caps(5, 20, 50));
        assert!(limiter.check(&db.pastes, &fp, now).is_ok());
    }

    #[test]
    fn minute_window_trips_first() {
        let (db, _dir) = setup_temp_db();
        let now = Utc::now();
        let fp = "aa".repeat(32);
        for i in 0..5 {
            db.pastes
                .insert(&submission(
                    &format!("burst{:03}", i),
                    &fp,
                    now - Duration::seconds(5 + i),
                ))
                .expect("insert");
        }

        let limiter = RateLimiter::new(caps(5, 20, 50));
        let err = limiter.check(&db.pastes, &fp, now).expect_err("tripped");
        assert!(matches!(
            err,
            AppError::RateLimited {
                window: RateWindow::Minute,
                cap: 5
            }
        ));
        assert!(err.to_string().contains("minute"));
    }

    #[test]
    fn hour_window_trips_on_spread_out_submissions() {
        let (db, _dir) = setup_temp_db();
        let now = Utc::now();
        let fp = "aa".repeat(32);
        // Spread over the hour so the minute window stays quiet.
        for i in 0..20 {
            db.pastes
                .insert(&submission(
                    &format!("hour{:04}", i),
                    &fp,
                    now - Duration::minutes(2 + i),
                ))
                .expect("insert");
        }

        let limiter = RateLimiter::new(caps(5, 20, 50));
        let err = limiter.check(&db.pastes, &fp, now).expect_err("tripped");
        assert!(matches!(
            err,
            AppError::RateLimited {
                window: RateWindow::Hour,
                cap: 20
            }
        ));
    }

    #[test]
    fn windows_are_per_fingerprint() {
        let (db, _dir) = setup_temp_db();
        let now = Utc::now();
        let noisy = "aa".repeat(32);
        for i in 0..5 {
            db.pastes
                .insert(&submission(
                    &format!("noisy{:03}", i),
                    &noisy,
                    now - Duration::seconds(5 + i),
                ))
                .expect("insert");
        }

        let limiter = RateLimiter::new(caps(5, 20, 50));
        let quiet = "bb".repeat(32);
        assert!(limiter.check(&db.pastes, &quiet, now).is_ok());
    }

    #[test]
    fn zero_cap_disables_a_window() {
        let (db, _dir) = setup_temp_db();
        let now = Utc::now();
        let fp = "aa".repeat(32);
        for i in 0..8 {
            db.pastes
                .insert(&submission(
                    &format!("free{:04}", i),
                    &fp,
                    now - Duration::seconds(5 + i),
                ))
                .expect("insert");
        }

        let limiter = RateLimiter::new(caps(0, 0, 0));
        assert!(limiter.check(&db.pastes, &fp, now).is_ok());
    }
}
