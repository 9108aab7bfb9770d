//! Notification relay.
//!
//! The friend engine reports relationship changes as [`NotificationEvent`]s
//! through a [`NotificationRelay`]. [`StoredRelay`] persists them so the
//! recipient can read them later from a [`NotificationInbox`].

mod error;
mod inbox;
mod relay;
pub mod types;

pub use error::{NotifyError, Result};
pub use inbox::NotificationInbox;
pub use relay::{NotificationRelay, StoredRelay};
pub use types::{Notification, NotificationEvent, NotificationId, NotificationKind};
