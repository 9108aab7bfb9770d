//! Shared application state.

use std::sync::Arc;

use amity_core::AmityCore;

use crate::auth::TokenIssuer;
use crate::error::AppError;

/// State handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub core: Arc<AmityCore>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    #[must_use]
    pub fn new(core: AmityCore, tokens: TokenIssuer) -> Self {
        Self {
            core: Arc::new(core),
            tokens: Arc::new(tokens),
        }
    }

    /// Runs a core call on the blocking pool.
    ///
    /// The core talks to `SQLite` synchronously, so calls must not run on
    /// the async workers.
    ///
    /// # Errors
    ///
    /// Returns the call's own error, or [`AppError::Internal`] if the
    /// blocking task panicked.
    pub async fn run<T, E, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&AmityCore) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<AppError> + Send + 'static,
    {
        let core = Arc::clone(&self.core);
        tokio::task::spawn_blocking(move || f(&core))
            .await
            .map_err(|e| AppError::Internal(format!("Blocking task failed: {e}")))?
            .map_err(Into::into)
    }
}
