//! Error type for storage operations.

use thiserror::Error;

/// Error type for `SQLite` storage operations.
///
/// Every variant is an infrastructure failure rather than a user-intent
/// failure; callers may retry the enclosing operation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database error from `SQLite`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("Failed to acquire database lock: {0}")]
    Lock(String),

    /// A stored row could not be decoded.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A uniqueness or check constraint rejected the write.
    #[error("Constraint conflict: {0}")]
    Conflict(String),

    /// Filesystem error while preparing the data directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Converts a write error, separating constraint violations from other
/// database failures.
pub(crate) fn map_write_error(err: rusqlite::Error, what: &str) -> StorageError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation {
            return StorageError::Conflict(format!("{what}: {err}"));
        }
    }
    StorageError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_error_display() {
        let err = StorageError::Lock("poisoned".to_string());
        assert_eq!(err.to_string(), "Failed to acquire database lock: poisoned");
    }

    #[test]
    fn conflict_error_display() {
        let err = StorageError::Conflict("users.username".to_string());
        assert_eq!(err.to_string(), "Constraint conflict: users.username");
    }

    #[test]
    fn non_constraint_error_stays_database() {
        let err = map_write_error(rusqlite::Error::QueryReturnedNoRows, "insert");
        assert!(matches!(err, StorageError::Database(_)));
    }
}
