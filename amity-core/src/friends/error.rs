//! Error types for friend relationship operations.
//!
//! Every variant except [`FriendError::Storage`] is a recoverable,
//! user-facing outcome of a validation rule. `Storage` is the transient
//! infrastructure failure a caller may retry.

use thiserror::Error;

use super::types::{RequestId, RequestStatus};
use crate::identity::UserId;
use crate::storage::StorageError;

/// Error type for friend relationship operations.
#[derive(Error, Debug)]
pub enum FriendError {
    /// A user tried to befriend themself.
    #[error("Cannot send a friend request to yourself ({0})")]
    InvalidTarget(UserId),

    /// A referenced user does not exist.
    #[error("User not found: {0}")]
    UnknownUser(UserId),

    /// The pair is already friends.
    #[error("Users {0} and {1} are already friends")]
    AlreadyFriends(UserId, UserId),

    /// A pending request already exists for the pair, in either direction.
    #[error("A friend request between {0} and {1} is already pending")]
    DuplicatePending(UserId, UserId),

    /// Friend request not found.
    #[error("Friend request not found: {0}")]
    NotFound(RequestId),

    /// Only the recipient may respond to a request.
    #[error("User {user} may not respond to friend request {request_id}")]
    NotAuthorized {
        /// The request.
        request_id: RequestId,
        /// The user who tried to respond.
        user: UserId,
    },

    /// The request already left the pending state.
    #[error("Friend request {request_id} was already {}", status.as_str())]
    AlreadyResolved {
        /// The request.
        request_id: RequestId,
        /// Its terminal status.
        status: RequestStatus,
    },

    /// The pair has no active friendship.
    #[error("Users {0} and {1} are not friends")]
    NotFriends(UserId, UserId),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl FriendError {
    /// Returns whether retrying the operation could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias for friend relationship operations.
pub type Result<T> = std::result::Result<T, FriendError>;
