//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while seeding the backing store.
///
/// None of these abort the run: a seeding failure skips the current
/// service's data-dependent test cases and the matrix continues.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection, query or transaction failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store did not accept a connection within the configured bound
    #[error("Database connection timed out after {seconds}s")]
    ConnectTimeout { seconds: u64 },
}
