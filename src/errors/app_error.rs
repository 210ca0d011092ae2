//! HTTP-facing error type.
//!
//! User-visible failures are reported as a generic message string in a JSON
//! body; no structured error code crosses the HTTP boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::core::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Pipeline(
                PipelineError::UnsupportedContent | PipelineError::EmptyContent,
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Pipeline(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request failed: {self}");
        let body = Json(json!({
            "status": "error",
            "msg": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::BadRequest("missing file".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Pipeline(PipelineError::UnsupportedContent).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
