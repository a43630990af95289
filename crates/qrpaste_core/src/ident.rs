//! Short identifier allocation with collision probing.
//!
//! Candidates are drawn from a 62-symbol alphanumeric alphabet using the
//! thread-local CSPRNG. Uniqueness is probed against the store before an
//! identifier is handed out; a saturated length escalates by widening the
//! identifier instead of retrying forever.

use crate::error::AppError;
use rand::Rng;

/// Alphabet for paste identifiers: digits plus upper/lower ASCII letters.
pub const ID_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Candidate probes per length before widening the identifier.
const MAX_ATTEMPTS_PER_LENGTH: usize = 10;

/// How far the identifier may grow past its base length before the
/// allocator gives up and reports a storage anomaly.
const MAX_LENGTH_GROWTH: usize = 8;

/// Generate one random identifier of `length` characters.
pub fn random_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let index = rng.gen_range(0..ID_ALPHABET.len());
            ID_ALPHABET[index] as char
        })
        .collect()
}

/// Allocate an identifier that `exists` reports as free.
///
/// The probe sees physically present rows, so identifiers of
/// expired-but-unswept pastes are never reused; swept ones may be.
///
/// # Errors
/// Propagates probe errors, and returns [`AppError::IdSpaceExhausted`]
/// when every length up to the growth ceiling stayed saturated.
pub fn allocate<F>(base_length: usize, mut exists: F) -> Result<String, AppError>
where
    F: FnMut(&str) -> Result<bool, AppError>,
{
    let mut length = base_length.max(1);
    for _ in 0..=MAX_LENGTH_GROWTH {
        for _ in 0..MAX_ATTEMPTS_PER_LENGTH {
            let candidate = random_id(length);
            if !exists(&candidate)? {
                return Ok(candidate);
            }
        }
        length += 1;
    }
    Err(AppError::IdSpaceExhausted(length))
}

#[cfg(test)]
mod tests {
    use super::{allocate, random_id, ID_ALPHABET, MAX_ATTEMPTS_PER_LENGTH};
    use crate::error::AppError;
    use std::collections::HashSet;

    #[test]
    fn random_id_has_requested_length_and_alphabet() {
        for length in [1, 8, 16] {
            let id = random_id(length);
            assert_eq!(id.len(), length);
            assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn allocate_returns_first_free_candidate() {
        let id = allocate(8, |_| Ok(false)).expect("free slot");
        assert_eq!(id.len(), 8);
    }

    #[test]
    fn allocate_widens_length_when_saturated() {
        let mut probes = 0usize;
        // The whole 8-character space reports taken; 9 characters are free.
        let id = allocate(8, |candidate| {
            probes += 1;
            Ok(candidate.len() == 8)
        })
        .expect("escalated slot");
        assert_eq!(id.len(), 9);
        assert_eq!(probes, MAX_ATTEMPTS_PER_LENGTH + 1);
    }

    #[test]
    fn allocate_gives_up_after_bounded_escalation() {
        let err = allocate(8, |_| Ok(true)).expect_err("exhaustion");
        assert!(matches!(err, AppError::IdSpaceExhausted(_)));
    }

    #[test]
    fn allocate_propagates_probe_errors() {
        let err = allocate(8, |_| Err(AppError::StorageMessage("probe failed".into())))
            .expect_err("probe error");
        assert!(matches!(err, AppError::StorageMessage(_)));
    }

    #[test]
    fn concurrent_style_allocation_yields_distinct_ids() {
        // Simulate racing allocators that share one claimed-set: each claim
        // is recorded at probe time, mirroring the store's insert guard.
        let mut claimed = HashSet::new();
        let mut ids = Vec::new();
        for _ in 0..64 {
            let id = allocate(4, |candidate| Ok(!claimed.insert(candidate.to_string())))
                .expect("free slot");
            ids.push(id);
        }
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
