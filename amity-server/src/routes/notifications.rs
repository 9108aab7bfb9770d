//! The caller's notification inbox.

use amity_core::notify::{Notification, NotificationId};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::{AppPath, AppQuery};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/read-all", put(read_all_handler))
        .route("/:id/read", put(read_handler))
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    unread: bool,
}

#[derive(Serialize)]
pub struct ReadAllResponse {
    updated: usize,
}

async fn list_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state
        .run(move |core| core.notifications().list(me, query.unread))
        .await?;
    Ok(Json(notifications))
}

async fn read_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state
        .run(move |core| core.notifications().mark_read(me, NotificationId(id)))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_all_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<ReadAllResponse>, AppError> {
    let updated = state
        .run(move |core| core.notifications().mark_all_read(me))
        .await?;
    Ok(Json(ReadAllResponse { updated }))
}
