//! Notification delivery boundary.

use std::sync::Arc;

use tracing::debug;

use super::error::Result;
use super::types::NotificationEvent;
use crate::storage::{notifications, SocialStorage};

/// Delivers relationship events to users.
///
/// The friend engine calls [`deliver`](Self::deliver) only after its
/// transaction committed. A delivery error is logged and dropped; it never
/// undoes the state change that produced the event.
pub trait NotificationRelay: Send + Sync {
    /// Hands one event on for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered.
    fn deliver(&self, event: &NotificationEvent) -> Result<()>;
}

/// Relay that writes each event to the recipient's inbox.
pub struct StoredRelay {
    storage: Arc<SocialStorage>,
}

impl StoredRelay {
    /// Creates a relay over shared storage.
    #[must_use]
    pub const fn new(storage: Arc<SocialStorage>) -> Self {
        Self { storage }
    }
}

impl NotificationRelay for StoredRelay {
    fn deliver(&self, event: &NotificationEvent) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let id = self
            .storage
            .transaction(|tx| notifications::insert_notification(tx, event, now))?;

        debug!(
            notification_id = %id,
            recipient_id = %event.recipient_id,
            kind = event.kind.as_str(),
            "Stored notification"
        );
        Ok(())
    }
}

impl std::fmt::Debug for StoredRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredRelay").finish_non_exhaustive()
    }
}
