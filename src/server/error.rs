//! HTTP mapping of poll errors

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::PollError;

/// Error returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// A store error
    Poll(PollError),
    /// Poll id that is not even a well-formed id
    UnknownPoll(String),
    /// Request body that could not be decoded
    Body(JsonRejection),
}

impl From<PollError> for ApiError {
    fn from(err: PollError) -> Self {
        ApiError::Poll(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Poll(PollError::NotFound(_)) | ApiError::UnknownPoll(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Poll(PollError::InvalidArgument(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Poll(PollError::InvalidOption { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Poll(err) => err.to_string(),
            ApiError::UnknownPoll(raw) => format!("Poll not found: {}", raw),
            ApiError::Body(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
