use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use shared::{ApiResponse, ValidationError};
use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Item not found")]
    NotFound { id: i32 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client. Store failures stay in the operator log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store(_) | AppError::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Store(e) => tracing::error!(error = %e, status = status.as_u16(), "Store error"),
            AppError::NotFound { id } => tracing::warn!(id, status = status.as_u16(), "Item not found"),
            AppError::Validation(e) => tracing::warn!(error = %e, status = status.as_u16(), "Rejected request"),
            AppError::Internal { message } => tracing::error!(error = %message, status = status.as_u16(), "Internal error"),
        }

        (status, Json(ApiResponse::<()>::failure(self.public_message()))).into_response()
    }
}

/// Maps errors raised by the middleware stack. A request that outlives
/// `request_timeout` is reported like any other store failure.
pub fn middleware_error(err: BoxError, request_timeout: Duration) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::Store(StoreError::Timeout(request_timeout))
    } else {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}
