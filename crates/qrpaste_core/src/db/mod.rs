//! Database layer for QRPaste backed by sled.

/// Paste storage helpers.
pub mod paste;

use crate::error::AppError;
use sled::Db;
use std::sync::Arc;

/// Database handle with access to the underlying sled trees.
pub struct Database {
    pub db: Arc<Db>,
    pub pastes: paste::PasteDb,
}

impl Database {
    /// Open the database and initialize trees.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if sled cannot open the database or trees.
    pub fn new(path: &str) -> Result<Self, AppError> {
        // Ensure the data directory exists
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let db = Arc::new(sled::open(path)?);
        Ok(Self {
            pastes: paste::PasteDb::new(db.clone())?,
            db,
        })
    }

    /// Flush all pending writes to disk.
    ///
    /// # Errors
    /// Returns an error if sled fails to flush.
    pub fn flush(&self) -> Result<(), AppError> {
        self.db.flush()?;
        Ok(())
    }

    /// Physical size of the database files, for maintenance reporting.
    ///
    /// # Errors
    /// Returns an error if sled cannot stat its files.
    pub fn size_on_disk(&self) -> Result<u64, AppError> {
        Ok(self.db.size_on_disk()?)
    }
}
