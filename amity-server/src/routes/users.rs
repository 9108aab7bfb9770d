//! User profiles and search.

use amity_core::identity::{ProfileUpdate, User, UserId, MAX_SEARCH_RESULTS};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::{AppJson, AppPath, AppQuery};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile_handler).put(update_profile_handler))
        .route("/search", get(search_handler))
        .route("/:id", get(user_handler))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn profile_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state.run(move |core| core.identity().resolve_user(me)).await?;
    Ok(Json(user))
}

async fn update_profile_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<Json<User>, AppError> {
    let user = state
        .run(move |core| core.identity().update_profile(me, update))
        .await?;
    Ok(Json(user))
}

/// Searches by name or username, leaving out the caller.
async fn search_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let q = query.q.trim().to_string();
    if q.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let users = state
        .run(move |core| {
            core.identity()
                .search_users(&q, Some(me), MAX_SEARCH_RESULTS)
        })
        .await?;
    Ok(Json(users))
}

async fn user_handler(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<User>, AppError> {
    let user = state
        .run(move |core| core.identity().resolve_user(UserId(id)))
        .await?;
    Ok(Json(user))
}
