//! Error types for notification delivery and the inbox.

use thiserror::Error;

use super::types::NotificationId;
use crate::storage::StorageError;

/// Error type for notification operations.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The notification does not exist or belongs to another user.
    #[error("Notification not found: {0}")]
    NotFound(NotificationId),

    /// The relay could not hand the event on.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
