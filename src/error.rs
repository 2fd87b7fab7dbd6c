use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::users::store::StoreError;

/// Client-visible error taxonomy. Every variant maps to a fixed status and a
/// fixed `{"msg": ...}` body; only `Internal` carries a source, and that
/// source is logged server-side rather than echoed to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("All fields are required.")]
    MissingField,
    #[error("Invalid email format.")]
    InvalidEmail,
    #[error("Password must be at least 6 characters.")]
    WeakPassword,
    #[error("Email is already registered.")]
    DuplicateEmail,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField
            | ApiError::InvalidEmail
            | ApiError::WeakPassword
            | ApiError::DuplicateEmail
            | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!(error = %source, "request failed");
        }
        (self.status(), Json(json!({ "msg": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::NotFound => ApiError::UserNotFound,
            StoreError::Other(source) => ApiError::Internal(source),
        }
    }
}
