//! Paste storage operations backed by sled.
//!
//! Three trees back the paste table: the canonical `pastes` tree keyed by
//! identifier, an expiry index ordered by `expires_at` for cheap sweeps,
//! and a submitter index ordered by fingerprint and creation time for
//! rate-limit window counts. Index rows are maintained on every insert
//! and removal; they never outlive their canonical row.

use crate::error::AppError;
use crate::models::paste::{ContentType, Paste};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sled::Db;
use std::sync::Arc;

/// Aggregate statistics for one content type, restricted to live rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeStats {
    pub content_type: ContentType,
    pub count: u64,
    pub total_size_bytes: u64,
}

/// Accessor for the paste trees.
pub struct PasteDb {
    tree: sled::Tree,
    expiry_tree: sled::Tree,
    submitter_tree: sled::Tree,
}

impl PasteDb {
    /// Open the paste trees.
    ///
    /// # Errors
    /// Returns an error if a tree cannot be opened.
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        let tree = db.open_tree("pastes")?;
        let expiry_tree = db.open_tree("pastes_by_expiry")?;
        let submitter_tree = db.open_tree("pastes_by_submitter")?;
        Ok(Self {
            tree,
            expiry_tree,
            submitter_tree,
        })
    }

    /// Insert a new paste.
    ///
    /// The write is guarded with a compare-and-swap so a primary-key
    /// collision fails distinguishably instead of overwriting; this is
    /// the last line of defense under the allocator's uniqueness check.
    ///
    /// # Errors
    /// [`AppError::IdCollision`] when the identifier is already present;
    /// storage or serialization errors otherwise.
    pub fn insert(&self, paste: &Paste) -> Result<(), AppError> {
        let value = bincode::serialize(paste)?;
        self.tree
            .compare_and_swap(
                paste.id.as_bytes(),
                None as Option<&[u8]>,
                Some(value),
            )?
            .map_err(|_| AppError::IdCollision(paste.id.clone()))?;

        self.expiry_tree.insert(
            expiry_key(paste.expires_at, &paste.id),
            paste.id.as_bytes(),
        )?;
        if let Some(fingerprint) = &paste.fingerprint {
            self.submitter_tree.insert(
                submitter_key(fingerprint, paste.created_at, &paste.id),
                paste.id.as_bytes(),
            )?;
        }
        Ok(())
    }

    /// Fetch a paste by id.
    ///
    /// Storage semantics only: expiration and password gating are the
    /// caller's responsibility.
    ///
    /// # Errors
    /// Returns an error if the lookup or decoding fails.
    pub fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        match self.tree.get(id.as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Whether a paste with this id is physically present.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    pub fn contains(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.tree.contains_key(id.as_bytes())?)
    }

    /// Delete a paste and its index rows.
    ///
    /// # Returns
    /// `true` if a paste was deleted.
    ///
    /// # Errors
    /// Returns an error if deletion fails.
    pub fn remove(&self, id: &str) -> Result<bool, AppError> {
        match self.tree.remove(id.as_bytes())? {
            Some(value) => {
                let paste: Paste = bincode::deserialize(&value)?;
                self.remove_index_entries(&paste)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Batch-delete rows whose `expires_at` is strictly before `now`.
    ///
    /// Idempotent: a second call immediately after deletes nothing.
    ///
    /// # Returns
    /// Number of pastes deleted.
    ///
    /// # Errors
    /// Returns an error if the scan or a deletion fails.
    pub fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        // Index keys are 8-byte millis followed by the id, so every key
        // with millis == now sorts after the bare 8-byte bound; the range
        // below is exactly "strictly before now".
        let upper = timestamp_millis(now).to_be_bytes().to_vec();
        let mut deleted = 0u64;
        for item in self.expiry_tree.range(..upper) {
            let (key, id_bytes) = item?;
            if let Some(value) = self.tree.remove(&id_bytes)? {
                let paste: Paste = bincode::deserialize(&value)?;
                if let Some(fingerprint) = &paste.fingerprint {
                    self.submitter_tree.remove(submitter_key(
                        fingerprint,
                        paste.created_at,
                        &paste.id,
                    ))?;
                }
                deleted += 1;
            }
            self.expiry_tree.remove(key)?;
        }
        Ok(deleted)
    }

    /// Count live rows as of `now`.
    ///
    /// # Errors
    /// Returns an error if iteration fails.
    pub fn count_active(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut count = 0u64;
        for item in self.tree.iter() {
            let (_, value) = item?;
            let paste: Paste = bincode::deserialize(&value)?;
            if !paste.is_expired(now) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Aggregate per-type counts and size sums over live rows.
    ///
    /// Types with no live rows are omitted, matching the reporting shape
    /// of a grouped query.
    ///
    /// # Errors
    /// Returns an error if iteration fails.
    pub fn stats_by_type(&self, now: DateTime<Utc>) -> Result<Vec<TypeStats>, AppError> {
        let mut counts = [0u64; ContentType::ALL.len()];
        let mut sizes = [0u64; ContentType::ALL.len()];
        for item in self.tree.iter() {
            let (_, value) = item?;
            let paste: Paste = bincode::deserialize(&value)?;
            if paste.is_expired(now) {
                continue;
            }
            let slot = ContentType::ALL
                .iter()
                .position(|t| *t == paste.content_type)
                .unwrap_or(0);
            counts[slot] += 1;
            sizes[slot] += paste.size_bytes;
        }
        Ok(ContentType::ALL
            .into_iter()
            .enumerate()
            .filter(|(slot, _)| counts[*slot] > 0)
            .map(|(slot, content_type)| TypeStats {
                content_type,
                count: counts[slot],
                total_size_bytes: sizes[slot],
            })
            .collect())
    }

    /// Count submissions by one fingerprint created strictly after `since`.
    ///
    /// Drives the rate-limit windows; counting is derived from persisted
    /// rows, so it can never drift from what was actually stored.
    ///
    /// # Errors
    /// Returns an error if the index scan fails.
    pub fn count_submissions_since(
        &self,
        fingerprint: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let prefix_len = fingerprint.len();
        let since_millis = timestamp_millis(since);
        let mut count = 0u64;
        for item in self.submitter_tree.scan_prefix(fingerprint.as_bytes()) {
            let (key, _) = item?;
            let Some(millis_bytes) = key.get(prefix_len..prefix_len + 8) else {
                continue;
            };
            let mut millis = [0u8; 8];
            millis.copy_from_slice(millis_bytes);
            if u64::from_be_bytes(millis) > since_millis {
                count += 1;
            }
        }
        Ok(count)
    }

    fn remove_index_entries(&self, paste: &Paste) -> Result<(), AppError> {
        self.expiry_tree
            .remove(expiry_key(paste.expires_at, &paste.id))?;
        if let Some(fingerprint) = &paste.fingerprint {
            self.submitter_tree.remove(submitter_key(
                fingerprint,
                paste.created_at,
                &paste.id,
            ))?;
        }
        Ok(())
    }
}

fn timestamp_millis(ts: DateTime<Utc>) -> u64 {
    ts.timestamp_millis().max(0) as u64
}

fn expiry_key(expires_at: DateTime<Utc>, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + id.len());
    key.extend_from_slice(&timestamp_millis(expires_at).to_be_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}

fn submitter_key(fingerprint: &str, created_at: DateTime<Utc>, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(fingerprint.len() + 8 + id.len());
    key.extend_from_slice(fingerprint.as_bytes());
    key.extend_from_slice(&timestamp_millis(created_at).to_be_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}
