//! Per-user notification inbox.

use std::sync::Arc;

use super::error::{NotifyError, Result};
use super::types::{Notification, NotificationId};
use crate::identity::UserId;
use crate::storage::{notifications, SocialStorage};

/// Reads and acknowledges notifications written by [`StoredRelay`](super::StoredRelay).
pub struct NotificationInbox {
    storage: Arc<SocialStorage>,
}

impl NotificationInbox {
    /// Creates an inbox over shared storage.
    #[must_use]
    pub const fn new(storage: Arc<SocialStorage>) -> Self {
        Self { storage }
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn list(&self, user_id: UserId, unread_only: bool) -> Result<Vec<Notification>> {
        Ok(self
            .storage
            .read(|conn| notifications::list_notifications(conn, user_id, unread_only))?)
    }

    /// Marks one of the user's notifications read.
    ///
    /// Marking an already-read notification is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::NotFound`] if the notification does not exist
    /// or belongs to someone else.
    pub fn mark_read(&self, user_id: UserId, id: NotificationId) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.storage.transaction(|tx| -> Result<()> {
            if !notifications::notification_belongs_to(tx, id, user_id)? {
                return Err(NotifyError::NotFound(id));
            }
            notifications::mark_read(tx, id, user_id, now)?;
            Ok(())
        })
    }

    /// Marks every unread notification read and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage update fails.
    pub fn mark_all_read(&self, user_id: UserId) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();
        Ok(self
            .storage
            .transaction(|tx| notifications::mark_all_read(tx, user_id, now))?)
    }

    /// Counts unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn unread_count(&self, user_id: UserId) -> Result<u64> {
        Ok(self
            .storage
            .read(|conn| notifications::unread_count(conn, user_id))?)
    }
}
