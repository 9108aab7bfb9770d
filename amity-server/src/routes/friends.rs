//! Friend requests and friendships.

use amity_core::friends::{
    Decision, FriendProfile, FriendRequest, IncomingRequest, Relationship, RequestId,
};
use amity_core::identity::{User, UserId};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::{AppJson, AppPath};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_friends_handler))
        .route("/requests", get(incoming_handler).post(send_handler))
        .route("/requests/sent", get(sent_handler))
        .route("/requests/:id", put(respond_handler))
        .route("/:id", delete(unfriend_handler))
        .route("/:id/profile", get(profile_handler))
        .route("/:id/relationship", get(relationship_handler))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    recipient_id: UserId,
}

#[derive(Deserialize)]
pub struct RespondRequest {
    status: Decision,
}

async fn list_friends_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    let friends = state.run(move |core| core.friends().list_friends(me)).await?;
    Ok(Json(friends))
}

async fn incoming_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<IncomingRequest>>, AppError> {
    let requests = state
        .run(move |core| core.friends().list_incoming_requests(me))
        .await?;
    Ok(Json(requests))
}

async fn sent_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<FriendRequest>>, AppError> {
    let requests = state
        .run(move |core| core.friends().list_sent_requests(me))
        .await?;
    Ok(Json(requests))
}

async fn send_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppJson(payload): AppJson<SendRequest>,
) -> Result<(StatusCode, Json<FriendRequest>), AppError> {
    let request = state
        .run(move |core| core.friends().send_request(me, payload.recipient_id))
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn respond_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<RespondRequest>,
) -> Result<Json<FriendRequest>, AppError> {
    let request = state
        .run(move |core| {
            core.friends()
                .respond_to_request(RequestId(id), me, payload.status)
        })
        .await?;
    Ok(Json(request))
}

async fn unfriend_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state
        .run(move |core| core.friends().unfriend(me, UserId(id)))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn profile_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<FriendProfile>, AppError> {
    let profile = state
        .run(move |core| core.friends().friend_profile(me, UserId(id)))
        .await?;
    Ok(Json(profile))
}

async fn relationship_handler(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Relationship>, AppError> {
    let relationship = state
        .run(move |core| core.friends().relationship(me, UserId(id)))
        .await?;
    Ok(Json(relationship))
}
