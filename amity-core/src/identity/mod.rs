//! Identity store.
//!
//! Holds user records (name, handle, avatar, bio) and their credentials.
//! Every other component resolves users through this store; the friend
//! engine resolves them inside its own transaction.
//!
//! Passwords are hashed with Argon2id and never leave the storage layer.

mod error;
mod manager;
mod password;
pub mod types;

pub use error::{IdentityError, Result};
pub use manager::{IdentityManager, MAX_SEARCH_RESULTS};
pub use password::{hash_password, verify_password};
pub use types::{is_valid_username, NewUser, ProfileUpdate, User, UserId};
