//! HTTP routes.
//!
//! Everything under `/api` is JSON. Other paths are served from the static
//! directory with an `index.html` fallback for client-side routing.

mod auth;
mod friends;
mod interests;
mod notifications;
mod users;

use std::time::Duration;

use axum::extract::{DefaultBodyLimit, FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, HOST, LOCATION};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Maximum request body size. Avatars arrive as data URLs.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// JSON body extractor whose rejection is an [`AppError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path extractor whose rejection is an [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string extractor whose rejection is an [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Builds the application router.
///
/// `static_dir` enables serving the single-page app; `force_https`
/// redirects requests that did not arrive over HTTPS.
pub fn router(state: AppState, static_dir: Option<&std::path::Path>, force_https: bool) -> Router {
    let api = Router::new()
        .nest("/auth", auth::routes())
        .nest("/users", users::routes())
        .nest("/interests", interests::routes())
        .nest("/friends", friends::routes())
        .nest("/notifications", notifications::routes());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let mut app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    if force_https {
        app = app.layer(middleware::from_fn(redirect_to_https));
    }

    app
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Redirects to HTTPS unless a proxy reports the request arrived over it.
async fn redirect_to_https(request: Request, next: Next) -> Response {
    let forwarded_https = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));

    if forwarded_https {
        return next.run(request).await;
    }

    let Some(host) = request.headers().get(HOST).and_then(|v| v.to_str().ok()) else {
        return next.run(request).await;
    };

    let target = format!(
        "https://{host}{}",
        request
            .uri()
            .path_and_query()
            .map_or("/", |pq| pq.as_str())
    );
    (StatusCode::MOVED_PERMANENTLY, [(LOCATION, target)]).into_response()
}

#[cfg(test)]
mod tests;
