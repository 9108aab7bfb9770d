//! Registration and login.

use amity_core::identity::{NewUser, User};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppJson;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}

#[derive(Serialize)]
pub struct AuthResponse {
    token: String,
    user: User,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

async fn register_handler(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewUser>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = state
        .run(move |core| core.identity().register(&payload))
        .await?;
    let token = state.tokens.issue(&user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

async fn login_handler(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .run(move |core| {
            core.identity()
                .authenticate(&payload.username, &payload.password)
        })
        .await?;
    let token = state.tokens.issue(&user)?;
    Ok(Json(AuthResponse { token, user }))
}
