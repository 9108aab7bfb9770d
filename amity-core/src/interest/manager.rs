//! Interest catalog API.

use std::sync::Arc;

use tracing::info;

use super::types::{validate_catalog, Interest};
use crate::identity::{IdentityError, Result, UserId};
use crate::storage::{interests, users, SocialStorage};

/// Reads and replaces per-user interest catalogs.
pub struct InterestCatalog {
    storage: Arc<SocialStorage>,
}

impl InterestCatalog {
    /// Creates a catalog over shared storage.
    #[must_use]
    pub const fn new(storage: Arc<SocialStorage>) -> Self {
        Self { storage }
    }

    /// Returns a user's interests in display order.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UserNotFound`] for an unknown user.
    pub fn get_interests(&self, user_id: UserId) -> Result<Vec<Interest>> {
        self.storage.read(|conn| -> Result<Vec<Interest>> {
            if !users::user_exists(conn, user_id)? {
                return Err(IdentityError::UserNotFound(user_id));
            }
            Ok(interests::get_interests(conn, user_id)?)
        })
    }

    /// Replaces a user's interests.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidData`] if the catalog has blank or
    /// duplicate categories, blank item names or out-of-range ratings, and
    /// [`IdentityError::UserNotFound`] for an unknown user.
    pub fn set_interests(&self, user_id: UserId, catalog: &[Interest]) -> Result<Vec<Interest>> {
        validate_catalog(catalog).map_err(IdentityError::InvalidData)?;

        let stored = self.storage.transaction(|tx| -> Result<Vec<Interest>> {
            if !users::user_exists(tx, user_id)? {
                return Err(IdentityError::UserNotFound(user_id));
            }
            interests::replace_interests(tx, user_id, catalog)?;
            Ok(interests::get_interests(tx, user_id)?)
        })?;

        info!(user_id = %user_id, categories = stored.len(), "Updated interests");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdentityManager, NewUser};

    fn setup() -> (InterestCatalog, UserId) {
        let storage = Arc::new(SocialStorage::in_memory().unwrap());
        let user = IdentityManager::new(Arc::clone(&storage))
            .register(&NewUser::new("Alice", "alice", "password123"))
            .unwrap();
        (InterestCatalog::new(storage), user.id)
    }

    #[test]
    fn set_then_get() {
        let (catalog, user_id) = setup();
        let interests = vec![Interest::new("Music").with_item("Jazz", 8)];

        let stored = catalog.set_interests(user_id, &interests).unwrap();
        assert_eq!(stored, interests);
        assert_eq!(catalog.get_interests(user_id).unwrap(), interests);
    }

    #[test]
    fn set_trims_names() {
        let (catalog, user_id) = setup();
        let stored = catalog
            .set_interests(user_id, &[Interest::new(" Music ").with_item(" Jazz", 8)])
            .unwrap();
        assert_eq!(stored[0].category, "Music");
        assert_eq!(stored[0].items[0].name, "Jazz");
    }

    #[test]
    fn invalid_catalog_leaves_previous_intact() {
        let (catalog, user_id) = setup();
        let original = vec![Interest::new("Music").with_item("Jazz", 8)];
        catalog.set_interests(user_id, &original).unwrap();

        let result = catalog.set_interests(user_id, &[Interest::new("Music").with_item("Jazz", 11)]);
        assert!(matches!(result, Err(IdentityError::InvalidData(_))));
        assert_eq!(catalog.get_interests(user_id).unwrap(), original);
    }

    #[test]
    fn unknown_user_fails() {
        let (catalog, _) = setup();
        assert!(matches!(
            catalog.get_interests(UserId(999)),
            Err(IdentityError::UserNotFound(_))
        ));
        assert!(matches!(
            catalog.set_interests(UserId(999), &[]),
            Err(IdentityError::UserNotFound(_))
        ));
    }
}
