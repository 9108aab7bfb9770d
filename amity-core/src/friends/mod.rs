//! Friend relationship engine.
//!
//! A user sends a friend request; the recipient accepts or rejects it.
//! Acceptance creates a symmetric friendship that either side can end by
//! unfriending. At most one request per pair is pending at a time, in
//! either direction.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use amity_core::friends::{Decision, FriendManager};
//! use amity_core::identity::{IdentityManager, NewUser};
//! use amity_core::notify::StoredRelay;
//! use amity_core::storage::SocialStorage;
//!
//! let dir = tempfile::tempdir()?;
//! let storage = Arc::new(SocialStorage::new(&dir.path().join("amity.db"))?);
//! let identity = IdentityManager::new(Arc::clone(&storage));
//! let alice = identity.register(&NewUser::new("Alice", "alice", "password123"))?;
//! let bob = identity.register(&NewUser::new("Bob", "bob", "password123"))?;
//!
//! let relay = Arc::new(StoredRelay::new(Arc::clone(&storage)));
//! let friends = FriendManager::new(storage, relay);
//!
//! let request = friends.send_request(alice.id, bob.id)?;
//! friends.respond_to_request(request.id, bob.id, Decision::Accept)?;
//! assert!(friends.are_friends(alice.id, bob.id)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod manager;
pub mod types;

pub use error::{FriendError, Result};
pub use manager::FriendManager;
pub use types::{
    Decision, FriendProfile, FriendRequest, FriendshipEdge, IncomingRequest, Relationship,
    RequestId, RequestStatus, UserPair,
};
