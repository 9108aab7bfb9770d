//! Amity HTTP server.
//!
//! Exposes [`amity_core`] as a JSON REST API for the single-page app:
//! JWT authentication, CORS, request tracing, static file serving and an
//! optional HTTPS redirect.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

pub use config::Args;
pub use error::AppError;
pub use state::AppState;

/// Serves `app` on `listener` until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
