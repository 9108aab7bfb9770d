//! The caller's interest catalog.

use amity_core::interest::Interest;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::AppJson;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_handler).put(set_handler))
}

async fn get_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<Interest>>, AppError> {
    let interests = state
        .run(move |core| core.interests().get_interests(me))
        .await?;
    Ok(Json(interests))
}

async fn set_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppJson(catalog): AppJson<Vec<Interest>>,
) -> Result<Json<Vec<Interest>>, AppError> {
    let interests = state
        .run(move |core| core.interests().set_interests(me, &catalog))
        .await?;
    Ok(Json(interests))
}
