//! Identity store: registration, authentication and profile edits.

use std::sync::Arc;

use tracing::info;

use super::error::{IdentityError, Result};
use super::password::{hash_password, verify_dummy, verify_password};
use super::types::{
    is_valid_username, NewUser, ProfileUpdate, User, UserId, MAX_USERNAME_LEN, MIN_PASSWORD_LEN,
    MIN_USERNAME_LEN,
};
use crate::storage::{users, SocialStorage, StorageError};

/// Maximum number of results returned by [`IdentityManager::search_users`].
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Resolves and maintains user records.
pub struct IdentityManager {
    storage: Arc<SocialStorage>,
}

impl IdentityManager {
    /// Creates an identity manager over shared storage.
    #[must_use]
    pub const fn new(storage: Arc<SocialStorage>) -> Self {
        Self { storage }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidData`] for a malformed name, username
    /// or password, and [`IdentityError::UsernameTaken`] when the handle is
    /// already registered (case-insensitively).
    pub fn register(&self, input: &NewUser) -> Result<User> {
        let name = input.name.trim();
        let username = input.username.trim();

        if name.is_empty() {
            return Err(IdentityError::InvalidData("Name is required".to_string()));
        }
        if !is_valid_username(username) {
            return Err(IdentityError::InvalidData(format!(
                "Username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} letters, digits, '_' or '.'"
            )));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::InvalidData(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = hash_password(&input.password)?;
        let now = chrono::Utc::now().timestamp();
        let email = input.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

        let record = users::UserRecord {
            name,
            username,
            email,
            password_hash: &password_hash,
            created_at: now,
        };

        let user = self
            .storage
            .transaction(|tx| users::insert_user(tx, &record))
            .map_err(|e| match e {
                StorageError::Conflict(_) => IdentityError::UsernameTaken(username.to_string()),
                other => other.into(),
            })?;

        info!(user_id = %user.id, username = %user.username, "Registered user");
        Ok(user)
    }

    /// Verifies a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] for an unknown username
    /// or a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let credentials = self
            .storage
            .read(|conn| users::get_credentials(conn, username.trim()))?;

        let Some((user, hash)) = credentials else {
            verify_dummy(password);
            return Err(IdentityError::InvalidCredentials);
        };

        if verify_password(password, &hash)? {
            Ok(user)
        } else {
            Err(IdentityError::InvalidCredentials)
        }
    }

    /// Resolves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UserNotFound`] if no such user exists, or a
    /// storage error if the lookup fails.
    pub fn resolve_user(&self, id: UserId) -> Result<User> {
        self.storage
            .read(|conn| users::get_user(conn, id))?
            .ok_or(IdentityError::UserNotFound(id))
    }

    /// Looks up a user by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .storage
            .read(|conn| users::get_user_by_username(conn, username.trim()))?)
    }

    /// Searches users by name or username, leaving out `exclude`.
    ///
    /// At most `limit` results are returned, capped at
    /// [`MAX_SEARCH_RESULTS`]. An empty query returns nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_users(
        &self,
        query: &str,
        exclude: Option<UserId>,
        limit: usize,
    ) -> Result<Vec<User>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit.min(MAX_SEARCH_RESULTS);
        Ok(self
            .storage
            .read(|conn| users::search_users(conn, query, exclude, limit))?)
    }

    /// Applies a profile edit and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UserNotFound`] for an unknown user and
    /// [`IdentityError::InvalidData`] if the edit would leave an empty name.
    pub fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        self.storage.transaction(|tx| -> Result<User> {
            let mut user = users::get_user(tx, id)?.ok_or(IdentityError::UserNotFound(id))?;
            update.apply(&mut user);

            if user.name.is_empty() {
                return Err(IdentityError::InvalidData("Name is required".to_string()));
            }

            users::update_profile(tx, &user, now)?;
            Ok(user)
        })
    }
}
