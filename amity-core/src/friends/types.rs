//! Core types for friend requests and friendships.
//!
//! A [`FriendRequest`] moves from [`RequestStatus::Pending`] to either
//! [`RequestStatus::Accepted`] or [`RequestStatus::Rejected`], both
//! terminal. Acceptance creates a [`FriendshipEdge`] keyed by the
//! unordered [`UserPair`]; unfriending deletes the edge and leaves the
//! request history untouched.

use serde::{Deserialize, Serialize};

use crate::identity::{User, UserId};
use crate::interest::Interest;

/// Unique identifier of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub i64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Sent, awaiting the recipient's response.
    Pending,
    /// Recipient accepted; a friendship was created.
    Accepted,
    /// Recipient rejected.
    Rejected,
}

impl RequestStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// The recipient's answer to a pending request.
///
/// Deserializes from either the verb (`accept`) or the resulting status
/// (`accepted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Establish the friendship.
    #[serde(rename = "accepted", alias = "accept")]
    Accept,
    /// Decline without notifying the sender.
    #[serde(rename = "rejected", alias = "reject")]
    Reject,
}

impl Decision {
    /// Status the request moves to.
    #[must_use]
    pub const fn resulting_status(self) -> RequestStatus {
        match self {
            Self::Accept => RequestStatus::Accepted,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

/// A directional proposal to become friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// Unique identifier.
    pub id: RequestId,
    /// Who sent the request.
    pub sender_id: UserId,
    /// Who may respond to it.
    pub recipient_id: UserId,
    /// Current status.
    pub status: RequestStatus,
    /// When the request was sent (Unix timestamp).
    pub created_at: i64,
    /// When the recipient responded (Unix timestamp).
    pub responded_at: Option<i64>,
}

impl FriendRequest {
    /// The unordered pair this request is about.
    #[must_use]
    pub fn pair(&self) -> UserPair {
        UserPair::ordered(self.sender_id, self.recipient_id)
    }
}

/// An unordered pair of distinct users, stored as `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserPair {
    low: UserId,
    high: UserId,
}

impl UserPair {
    /// Creates the pair, or `None` if both IDs are the same user.
    #[must_use]
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        (a != b).then(|| Self::ordered(a, b))
    }

    fn ordered(a: UserId, b: UserId) -> Self {
        if a < b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The smaller ID.
    #[must_use]
    pub const fn low(&self) -> UserId {
        self.low
    }

    /// The larger ID.
    #[must_use]
    pub const fn high(&self) -> UserId {
        self.high
    }

    /// Returns whether `user` is one of the two.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.low == user || self.high == user
    }
}

/// An active friendship between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipEdge {
    /// The smaller user ID.
    pub user_a: UserId,
    /// The larger user ID.
    pub user_b: UserId,
    /// Request whose acceptance created the edge.
    pub request_id: RequestId,
    /// When the friendship was established (Unix timestamp).
    pub since: i64,
}

/// A pending incoming request together with its sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    /// The request.
    #[serde(flatten)]
    pub request: FriendRequest,
    /// The sender's profile.
    pub sender: User,
}

/// How one user relates to another, from the viewer's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Relationship {
    /// The viewer is looking at themself.
    #[serde(rename = "self")]
    SelfUser,
    /// Friends.
    Friends,
    /// The viewer sent a pending request.
    RequestSent {
        /// The pending request.
        #[serde(rename = "requestId")]
        request_id: RequestId,
    },
    /// The other user sent the viewer a pending request.
    RequestReceived {
        /// The pending request.
        #[serde(rename = "requestId")]
        request_id: RequestId,
    },
    /// No relationship.
    None,
}

/// A friend's profile as shown to the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendProfile {
    /// The friend's user record.
    #[serde(flatten)]
    pub user: User,
    /// The friend's interest catalog.
    pub interests: Vec<Interest>,
    /// When the friendship was established (Unix timestamp).
    pub friends_since: i64,
}
