//! API error type
//!
//! Every error body has the same shape as a success message:
//! `{"msg": "..."}`. Internal detail is logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::Error;

pub const BAD_REQUEST: &str = "Bad Request";
pub const BAD_BPM_VALUE: &str = "Bad Request, please check the bpm value";
pub const INTERNAL_ERROR: &str = "Internal Server Error";

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request or unknown value (400)
    #[error("{0}")]
    BadRequest(&'static str),

    /// Unexpected fault (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::ValueNotFound(_) => ApiError::BadRequest(BAD_BPM_VALUE),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_not_found_is_bad_request() {
        let response = ApiError::from(Error::ValueNotFound(90)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = ApiError::from(Error::Internal("tempo store lock poisoned".to_string()));
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_session_misuse_is_internal() {
        let err = ApiError::from(Error::AlreadyLearning);
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
