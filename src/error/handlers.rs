//! Error handlers
//!
//! Maps errors onto HTTP status codes and the `{"success": false}` envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use std::any::Any;

use crate::error::types::{ApiError, StorageError};
use crate::protocol::responses::FailureResponse;

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

impl ApiError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Storage(StorageError::InvalidRequest(_)) | ApiError::Malformed(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Auth(_) | ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::Storage(StorageError::NotFound(_)) | ApiError::UnknownRoute => {
                StatusCode::NOT_FOUND
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage(StorageError::Corrupt { .. })
            | ApiError::Storage(StorageError::StorageUnavailable { .. })
            | ApiError::Storage(StorageError::Unexpected(_))
            | ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Paths and internal detail stay in the log.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Storage(StorageError::NotFound(_)) => "archive not found".to_string(),
            ApiError::Storage(StorageError::StorageUnavailable { .. })
            | ApiError::Storage(StorageError::Unexpected(_))
            | ApiError::Unexpected(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Log an API error at a level matching its status
pub fn handle_error(err: &ApiError) {
    if err.status_code().is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        handle_error(&self);
        let status = self.status_code();
        let body = FailureResponse::new(self.client_message());
        (status, Json(body)).into_response()
    }
}

/// Turn a handler panic into the 500 envelope instead of a dropped connection
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Unexpected(detail).into_response()
}
