//! Error types for identity and profile operations.

use thiserror::Error;

use super::types::UserId;
use crate::storage::StorageError;

/// Error type for identity, profile and interest operations.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// No user with this ID.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// The requested username is already registered.
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Invalid data provided.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Password hashing failed.
    #[error("Password error: {0}")]
    Password(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;
