//! HTTP error type.
//!
//! Every handler returns [`AppError`] on failure. Domain errors keep their
//! message and map to a status code; the body is always
//! `{"error": "<message>"}`.

use amity_core::friends::FriendError;
use amity_core::identity::IdentityError;
use amity_core::notify::NotifyError;
use amity_core::storage::StorageError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Friend(#[from] FriendError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Friend(e) => match e {
                FriendError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
                FriendError::NotAuthorized { .. } => StatusCode::FORBIDDEN,
                FriendError::UnknownUser(_)
                | FriendError::NotFound(_)
                | FriendError::NotFriends(_, _) => StatusCode::NOT_FOUND,
                FriendError::AlreadyFriends(_, _)
                | FriendError::DuplicatePending(_, _)
                | FriendError::AlreadyResolved { .. } => StatusCode::CONFLICT,
                FriendError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Identity(e) => match e {
                IdentityError::UserNotFound(_) => StatusCode::NOT_FOUND,
                IdentityError::UsernameTaken(_) => StatusCode::CONFLICT,
                IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                IdentityError::InvalidData(_) => StatusCode::BAD_REQUEST,
                IdentityError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
                IdentityError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Notify(e) => match e {
                NotifyError::NotFound(_) => StatusCode::NOT_FOUND,
                NotifyError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
                NotifyError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedPayload(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::MalformedPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::MalformedPayload(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
