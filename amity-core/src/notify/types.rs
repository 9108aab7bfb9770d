//! Notification events and inbox records.

use serde::{Deserialize, Serialize};

use crate::friends::RequestId;
use crate::identity::UserId;

/// Unique identifier of a stored notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub i64);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone sent the recipient a friend request.
    FriendRequestReceived,
    /// The recipient's friend request was accepted.
    FriendRequestAccepted,
}

impl NotificationKind {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FriendRequestReceived => "friend_request_received",
            Self::FriendRequestAccepted => "friend_request_accepted",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "friend_request_received" => Some(Self::FriendRequestReceived),
            "friend_request_accepted" => Some(Self::FriendRequestAccepted),
            _ => None,
        }
    }
}

/// An event handed to a [`NotificationRelay`](super::NotificationRelay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Event type.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Who is being notified.
    pub recipient_id: UserId,
    /// Who caused the event.
    pub sender_id: UserId,
    /// The friend request involved.
    pub request_id: RequestId,
}

impl NotificationEvent {
    /// A new request from `sender_id` reached `recipient_id`.
    #[must_use]
    pub const fn request_received(
        recipient_id: UserId,
        sender_id: UserId,
        request_id: RequestId,
    ) -> Self {
        Self {
            kind: NotificationKind::FriendRequestReceived,
            recipient_id,
            sender_id,
            request_id,
        }
    }

    /// `accepter_id` accepted the request `original_sender_id` sent.
    #[must_use]
    pub const fn request_accepted(
        original_sender_id: UserId,
        accepter_id: UserId,
        request_id: RequestId,
    ) -> Self {
        Self {
            kind: NotificationKind::FriendRequestAccepted,
            recipient_id: original_sender_id,
            sender_id: accepter_id,
            request_id,
        }
    }
}

/// A notification stored in a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier.
    pub id: NotificationId,
    /// The event that was delivered.
    #[serde(flatten)]
    pub event: NotificationEvent,
    /// When it was delivered (Unix timestamp).
    pub created_at: i64,
    /// When the recipient read it (Unix timestamp).
    pub read_at: Option<i64>,
}

impl Notification {
    /// Returns whether the recipient has seen it.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
