//! API errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn form_not_found() -> Self {
        Self::NotFound("Form not found".into())
    }

    /// Failure while reading or deleting: schema problems are the client's,
    /// everything else is ours.
    pub fn on_read(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(msg) => Self::BadRequest(msg),
            StoreError::Storage(msg) => Self::Internal(msg),
        }
    }

    /// Failure while writing: always reported as a bad request.
    pub fn on_write(err: StoreError) -> Self {
        Self::BadRequest(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        (status, Json(ErrorResponse { message: self.to_string() })).into_response()
    }
}
