//! HTTP error responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use aqualan_core::ports::PortError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ApiError {
    /// Body with `code` and `message`.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Invalid request.
    #[error("{0}")]
    BadRequest(String),
    /// Request conflicts with the server setup.
    #[error("{0}")]
    Conflict(String),
    /// An upstream dependency failed.
    #[error("{0}")]
    Upstream(String),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }

        (status, Json(ApiError::new(code, self.to_string()))).into_response()
    }
}

impl From<PortError> for AppError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::ProductNotFound => AppError::NotFound("Producto no encontrado".to_owned()),
            PortError::OrderNotFound => AppError::NotFound("Pedido no encontrado".to_owned()),
            PortError::InvalidStatus(_) | PortError::Validation(_) => {
                AppError::BadRequest(err.to_string())
            }
            PortError::Network(_)
            | PortError::Io(_)
            | PortError::Sheet(_)
            | PortError::Notifier(_) => AppError::Upstream(err.to_string()),
            PortError::Internal(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
