//! Entry point that wires storage, managers and the notification relay.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::friends::FriendManager;
use crate::identity::IdentityManager;
use crate::interest::InterestCatalog;
use crate::notify::{NotificationInbox, NotificationRelay, StoredRelay};
use crate::storage::{self, SocialStorage};

/// Core interface for Amity functionality.
///
/// All managers share one [`SocialStorage`]. Friend events are delivered
/// through the configured relay, which by default stores them in the
/// notification inbox.
pub struct AmityCore {
    identity: IdentityManager,
    interests: InterestCatalog,
    friends: FriendManager,
    notifications: NotificationInbox,
}

impl AmityCore {
    /// Opens (or creates) the database in `data_dir`.
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    ///
    /// # Examples
    ///
    /// ```
    /// use amity_core::AmityCore;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let core = AmityCore::open(dir.path())?;
    /// assert!(core.friends().list_friends(amity_core::identity::UserId(1))?.is_empty());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(data_dir: &Path) -> storage::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(storage::DATABASE_FILE);
        let storage = Arc::new(SocialStorage::new(&path)?);
        info!(path = %path.display(), "Opened Amity database");

        let relay = Arc::new(StoredRelay::new(Arc::clone(&storage)));
        Ok(Self::from_storage(storage, relay))
    }

    /// Builds the core over existing storage and a custom relay.
    #[must_use]
    pub fn from_storage(storage: Arc<SocialStorage>, relay: Arc<dyn NotificationRelay>) -> Self {
        Self {
            identity: IdentityManager::new(Arc::clone(&storage)),
            interests: InterestCatalog::new(Arc::clone(&storage)),
            friends: FriendManager::new(Arc::clone(&storage), relay),
            notifications: NotificationInbox::new(storage),
        }
    }

    /// Creates a core over in-memory storage for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn open_in_memory() -> storage::Result<Self> {
        let storage = Arc::new(SocialStorage::in_memory()?);
        let relay = Arc::new(StoredRelay::new(Arc::clone(&storage)));
        Ok(Self::from_storage(storage, relay))
    }

    /// User accounts and profiles.
    #[must_use]
    pub const fn identity(&self) -> &IdentityManager {
        &self.identity
    }

    /// Per-user interest catalogs.
    #[must_use]
    pub const fn interests(&self) -> &InterestCatalog {
        &self.interests
    }

    /// Friend requests and friendships.
    #[must_use]
    pub const fn friends(&self) -> &FriendManager {
        &self.friends
    }

    /// Stored notifications.
    #[must_use]
    pub const fn notifications(&self) -> &NotificationInbox {
        &self.notifications
    }
}

impl std::fmt::Debug for AmityCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmityCore").finish_non_exhaustive()
    }
}
