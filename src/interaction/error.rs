//! Unified API error handling
//!
//! Every failure on the HTTP surface resolves to a JSON body with an `error` key.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::base::types::{ClassificationRecord, ResponseMetadata};

use super::predict::PredictResponse;

/// API error type returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Missing/empty ticket or a malformed body (400).
    #[error("{0}")]
    BadRequest(String),

    /// Unsupported method on a known route (405).
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Unknown route (404).
    #[error("Not Found")]
    NotFound,

    /// The generation model could not be reached or returned nothing usable (500).
    ///
    /// The body still carries a best-effort record describing the failure.
    #[error("{message}")]
    Upstream { message: String, record: Box<ClassificationRecord> },

    /// Anything else, e.g. a panicked classification task (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap a generation failure, building the record the caller can display.
    pub fn upstream(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        let record = Box::new(ClassificationRecord::upstream_failure(&message));

        Self::Upstream { message, record }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), message = %self, "API error");
        } else {
            warn!(status = status.as_u16(), message = %self, "API error");
        }

        match self {
            ApiError::Upstream { message, record } => {
                let body = PredictResponse::new(*record, ResponseMetadata::default()).with_error(message);
                (status, Json(body)).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".to_string()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Internal("x".to_string()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::upstream(&anyhow::anyhow!("boom")).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Gemini call failed");

        let ApiError::Upstream { message, record } = ApiError::upstream(&err) else {
            panic!("expected an upstream error");
        };

        assert_eq!(message, "Gemini call failed: connection refused");
        assert_eq!(record.raw, "エラー: Gemini call failed: connection refused");
    }
}
