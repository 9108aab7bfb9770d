//! Friend relationship engine.
//!
//! [`FriendManager`] is the only writer of friend requests and friendship
//! edges. Each operation runs in one immediate transaction, so the checks
//! and the write it guards are atomic and operations on any pair are
//! serialized. Notifications go out only after the transaction committed.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::{FriendError, Result};
use super::types::{
    Decision, FriendProfile, FriendRequest, IncomingRequest, Relationship, RequestId,
    RequestStatus, UserPair,
};
use crate::identity::{User, UserId};
use crate::notify::{NotificationEvent, NotificationRelay};
use crate::storage::{friends, interests, users, SocialStorage, StorageError};

/// Manages friend requests and friendships.
pub struct FriendManager {
    storage: Arc<SocialStorage>,
    relay: Arc<dyn NotificationRelay>,
}

impl FriendManager {
    /// Creates a friend manager over shared storage.
    #[must_use]
    pub fn new(storage: Arc<SocialStorage>, relay: Arc<dyn NotificationRelay>) -> Self {
        Self { storage, relay }
    }

    /// Sends a friend request from `sender_id` to `recipient_id`.
    ///
    /// On success the recipient is notified with a
    /// `friend_request_received` event.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`FriendError::InvalidTarget`] if sender and recipient are the same
    /// - [`FriendError::UnknownUser`] if either user does not exist
    /// - [`FriendError::AlreadyFriends`] if they are already friends
    /// - [`FriendError::DuplicatePending`] if a request between them is
    ///   pending in either direction
    pub fn send_request(&self, sender_id: UserId, recipient_id: UserId) -> Result<FriendRequest> {
        let pair =
            UserPair::new(sender_id, recipient_id).ok_or(FriendError::InvalidTarget(sender_id))?;
        let now = chrono::Utc::now().timestamp();

        let request = self.storage.transaction(|tx| -> Result<FriendRequest> {
            for user in [sender_id, recipient_id] {
                if !users::user_exists(tx, user)? {
                    return Err(FriendError::UnknownUser(user));
                }
            }
            if friends::friendship_exists(tx, pair)? {
                return Err(FriendError::AlreadyFriends(sender_id, recipient_id));
            }
            if friends::pending_between(tx, pair)?.is_some() {
                return Err(FriendError::DuplicatePending(sender_id, recipient_id));
            }

            friends::insert_request(tx, sender_id, recipient_id, pair, now).map_err(|e| match e {
                StorageError::Conflict(_) => {
                    FriendError::DuplicatePending(sender_id, recipient_id)
                }
                other => other.into(),
            })
        })?;

        info!(
            request_id = %request.id,
            sender_id = %sender_id,
            recipient_id = %recipient_id,
            "Friend request sent"
        );
        self.notify(&NotificationEvent::request_received(
            recipient_id,
            sender_id,
            request.id,
        ));

        Ok(request)
    }

    /// Accepts or rejects a pending request on behalf of its recipient.
    ///
    /// Accepting creates the friendship and notifies the original sender.
    /// Rejecting notifies nobody.
    ///
    /// # Errors
    ///
    /// - [`FriendError::NotFound`] if the request does not exist
    /// - [`FriendError::NotAuthorized`] if `responder_id` is not the recipient
    /// - [`FriendError::AlreadyResolved`] if the request is no longer pending
    pub fn respond_to_request(
        &self,
        request_id: RequestId,
        responder_id: UserId,
        decision: Decision,
    ) -> Result<FriendRequest> {
        let now = chrono::Utc::now().timestamp();
        let status = decision.resulting_status();

        let request = self.storage.transaction(|tx| -> Result<FriendRequest> {
            let mut request =
                friends::get_request(tx, request_id)?.ok_or(FriendError::NotFound(request_id))?;

            if request.recipient_id != responder_id {
                return Err(FriendError::NotAuthorized {
                    request_id,
                    user: responder_id,
                });
            }
            if request.status.is_terminal()
                || !friends::resolve_request(tx, request_id, status, now)?
            {
                return Err(FriendError::AlreadyResolved {
                    request_id,
                    status: request.status,
                });
            }

            if status == RequestStatus::Accepted
                && !friends::insert_friendship(tx, request.pair(), request_id, now)?
            {
                return Err(StorageError::InvalidData(format!(
                    "Friendship already exists for pending request {request_id}"
                ))
                .into());
            }

            request.status = status;
            request.responded_at = Some(now);
            Ok(request)
        })?;

        info!(
            request_id = %request_id,
            responder_id = %responder_id,
            status = status.as_str(),
            "Friend request resolved"
        );
        if status == RequestStatus::Accepted {
            self.notify(&NotificationEvent::request_accepted(
                request.sender_id,
                responder_id,
                request_id,
            ));
        }

        Ok(request)
    }

    /// Ends the friendship between two users.
    ///
    /// The request that created the friendship keeps its `accepted` status.
    ///
    /// # Errors
    ///
    /// Returns [`FriendError::NotFriends`] if there is no friendship, which
    /// includes a retry after a successful unfriend.
    pub fn unfriend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
        let pair = UserPair::new(user_id, friend_id)
            .ok_or(FriendError::NotFriends(user_id, friend_id))?;

        let removed = self
            .storage
            .transaction(|tx| friends::delete_friendship(tx, pair))?;
        if !removed {
            return Err(FriendError::NotFriends(user_id, friend_id));
        }

        info!(user_id = %user_id, friend_id = %friend_id, "Friendship removed");
        Ok(())
    }

    /// Lists a user's friends ordered by name, then ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn list_friends(&self, user_id: UserId) -> Result<Vec<User>> {
        let found = self
            .storage
            .read(|conn| friends::list_friends(conn, user_id))?;
        debug!(user_id = %user_id, count = found.len(), "Listed friends");
        Ok(found)
    }

    /// Lists pending requests addressed to a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn list_pending_requests(&self, user_id: UserId) -> Result<Vec<FriendRequest>> {
        Ok(self
            .storage
            .read(|conn| friends::pending_received(conn, user_id))?)
    }

    /// Lists pending requests addressed to a user together with each
    /// sender, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn list_incoming_requests(&self, user_id: UserId) -> Result<Vec<IncomingRequest>> {
        Ok(self
            .storage
            .read(|conn| friends::incoming_with_senders(conn, user_id))?)
    }

    /// Lists pending requests a user has sent, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn list_sent_requests(&self, user_id: UserId) -> Result<Vec<FriendRequest>> {
        Ok(self
            .storage
            .read(|conn| friends::pending_sent(conn, user_id))?)
    }

    /// Gets a request by ID.
    ///
    /// # Errors
    ///
    /// Returns [`FriendError::NotFound`] if the request does not exist.
    pub fn get_request(&self, request_id: RequestId) -> Result<FriendRequest> {
        self.storage
            .read(|conn| friends::get_request(conn, request_id))?
            .ok_or(FriendError::NotFound(request_id))
    }

    /// Returns whether two users are friends.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn are_friends(&self, a: UserId, b: UserId) -> Result<bool> {
        let Some(pair) = UserPair::new(a, b) else {
            return Ok(false);
        };
        Ok(self
            .storage
            .read(|conn| friends::friendship_exists(conn, pair))?)
    }

    /// Describes how `other` relates to `viewer`.
    ///
    /// # Errors
    ///
    /// Returns [`FriendError::UnknownUser`] if `other` does not exist.
    pub fn relationship(&self, viewer: UserId, other: UserId) -> Result<Relationship> {
        self.storage.read(|conn| -> Result<Relationship> {
            if !users::user_exists(conn, other)? {
                return Err(FriendError::UnknownUser(other));
            }
            let Some(pair) = UserPair::new(viewer, other) else {
                return Ok(Relationship::SelfUser);
            };
            if friends::friendship_exists(conn, pair)? {
                return Ok(Relationship::Friends);
            }

            Ok(match friends::pending_between(conn, pair)? {
                Some(request) if request.sender_id == viewer => Relationship::RequestSent {
                    request_id: request.id,
                },
                Some(request) => Relationship::RequestReceived {
                    request_id: request.id,
                },
                None => Relationship::None,
            })
        })
    }

    /// Loads a friend's profile and interests.
    ///
    /// # Errors
    ///
    /// - [`FriendError::UnknownUser`] if `friend_id` does not exist
    /// - [`FriendError::NotFriends`] if the two are not friends
    pub fn friend_profile(&self, viewer: UserId, friend_id: UserId) -> Result<FriendProfile> {
        self.storage.read(|conn| -> Result<FriendProfile> {
            let user =
                users::get_user(conn, friend_id)?.ok_or(FriendError::UnknownUser(friend_id))?;
            let edge = UserPair::new(viewer, friend_id)
                .map(|pair| friends::get_friendship(conn, pair))
                .transpose()?
                .flatten()
                .ok_or(FriendError::NotFriends(viewer, friend_id))?;

            Ok(FriendProfile {
                user,
                interests: interests::get_interests(conn, friend_id)?,
                friends_since: edge.since,
            })
        })
    }

    fn notify(&self, event: &NotificationEvent) {
        if let Err(e) = self.relay.deliver(event) {
            warn!(
                error = %e,
                kind = event.kind.as_str(),
                recipient_id = %event.recipient_id,
                request_id = %event.request_id,
                "Failed to deliver notification"
            );
        }
    }
}

impl std::fmt::Debug for FriendManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FriendManager").finish_non_exhaustive()
    }
}
