//! Amity server binary.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amity_core::AmityCore;
use amity_server::auth::TokenIssuer;
use amity_server::{routes, serve, AppState, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {e}");
        std::process::exit(1);
    }

    info!("Listen: {}", args.listen);
    info!("Data dir: {}", args.data_dir.display());
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });

    let tokens = match args.jwt_secret.as_deref() {
        Some(secret) => TokenIssuer::new(secret, args.jwt_expiry_seconds)
            .map_err(anyhow::Error::msg)
            .context("Invalid JWT secret")?,
        None => {
            warn!("No JWT_SECRET set, using the built-in development secret");
            TokenIssuer::new_dev(args.jwt_expiry_seconds)
        }
    };

    let data_dir = args.data_dir.clone();
    let core = tokio::task::spawn_blocking(move || AmityCore::open(&data_dir))
        .await
        .context("Database open task failed")?
        .context("Failed to open database")?;

    let static_dir = args.static_dir.is_dir().then_some(args.static_dir.as_path());
    if static_dir.is_none() {
        warn!("Static directory {} not found, serving API only", args.static_dir.display());
    }

    let app = routes::router(AppState::new(core, tokens), static_dir, args.force_https);

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen))?;

    serve(listener, app).await.context("Server error")?;
    Ok(())
}
