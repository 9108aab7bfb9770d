//! Amity Core Library
//!
//! Core functionality for Amity, a small social network: user accounts,
//! interest profiles, friend requests and friendships, and notifications.
//! Everything is stored in a single `SQLite` database and exposed through a
//! synchronous API; [`AmityCore`] wires the managers together.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod friends;
pub mod identity;
pub mod interest;
pub mod notify;
pub mod storage;

pub use api::AmityCore;
