use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;

/// Request-terminating errors for the HTTP surface.
///
/// Storage detail is logged and replaced with a generic message so driver
/// errors never leak credentials or query text to the caller. Model and file
/// errors surface their cause in the body, matching the behavior chat
/// frontends already rely on for diagnostics.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller sent an invalid request.
    #[error("{0}")]
    BadRequest(String),

    /// The conversation store could not be reached or queried.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Model invocation or file handling failed mid-orchestration.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn storage(err: impl Display) -> Self {
        ApiError::Storage(err.to_string())
    }

    pub fn upstream(err: impl Display) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Storage(m) => {
                error!("Storage error: {}", m);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not reach the conversation store.".to_string(),
                )
            }
            ApiError::Upstream(m) => {
                error!("Chat orchestration error: {}", m);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An error occurred: {}", m),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
