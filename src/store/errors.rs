//! # Record Store Errors

use thiserror::Error;

use super::item::ItemId;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row exists for the id. A valid-but-absent id is not a failure of
    /// the storage engine.
    #[error("Item {id} not found")]
    NotFound { id: ItemId },

    /// The storage engine failed (connection loss, constraint violation, ...)
    #[error("Persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether this error is the not-found signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
