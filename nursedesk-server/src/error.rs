//! Translation of store errors into HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nursedesk_core::NursedeskError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] NursedeskError),

    /// The request could not be parsed at all (bad JSON, bad id segment).
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", value.body_text()))
    }
}

impl ApiError {
    /// Status code, taxonomy name and message for this error.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Store(NursedeskError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "ValidationError", msg.clone())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "ValidationError", msg.clone()),
            Self::Store(e @ NursedeskError::DuplicateLicense(_)) => {
                (StatusCode::BAD_REQUEST, "DuplicateLicense", e.user_message())
            }
            Self::Store(e @ NursedeskError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NotFound", e.user_message())
            }
            Self::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, "StoreError", e.user_message()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "StoreError", msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = self.parts();

        if status.is_server_error() {
            log::error!("request failed: {self}");
        } else {
            log::warn!("request rejected ({kind}): {message}");
        }

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
