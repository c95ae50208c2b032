//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diet_tracker_shared::types::{ErrorDetail, ErrorResponse};
use diet_tracker_shared::validation::format_validation_errors;
use thiserror::Error;
use tracing::error;

/// Upload failures for multipart image fields
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("The file has to be a png, jpg or gif image (got {0})")]
    UnsupportedType(String),

    #[error("The file exceeds the maximum size of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Missing file field: {0}")]
    Missing(String),

    #[error("Failed to store file: {0}")]
    Storage(#[from] std::io::Error),
}

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Rollback failed after {original}: {rollback}")]
    RollbackFailed { original: String, rollback: String },

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Classify an error raised while writing an aggregate
    ///
    /// Constraint violations (bad foreign keys, check constraints, string
    /// lengths, numeric overflow) are the caller's fault and surface as
    /// transactional errors.
    pub fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let constraint_violation = db_err
                    .code()
                    .map(|code| code.starts_with("23") || code == "22001" || code == "22003")
                    .unwrap_or(false);
                if constraint_violation {
                    ApiError::Transaction(db_err.message().to_string())
                } else {
                    ApiError::Database(err)
                }
            }
            _ => ApiError::Database(err),
        }
    }

    /// Map a failed insert, reporting a unique violation as `Conflict`
    pub fn from_insert(err: anyhow::Error, conflict: &str) -> Self {
        let unique_violation = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .map(|db_err| db_err.is_unique_violation())
            .unwrap_or(false);
        if unique_violation {
            ApiError::Conflict(conflict.to_string())
        } else {
            ApiError::Internal(err)
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(format_validation_errors(&errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Transaction(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "TRANSACTION_ERROR",
                msg.clone(),
            ),
            ApiError::RollbackFailed { original, rollback } => {
                error!(original = %original, rollback = %rollback, "Rollback failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ROLLBACK_FAILED",
                    "The operation failed and could not be rolled back".to_string(),
                )
            }
            ApiError::Upload(err) => {
                let status = match err {
                    UploadError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    UploadError::Missing(_) => StatusCode::BAD_REQUEST,
                    UploadError::Storage(io_err) => {
                        error!("Upload storage error: {:?}", io_err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, "UPLOAD_ERROR", err.to_string())
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field: None,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::Validation("Invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("Diet not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_error_status() {
        let error = ApiError::Unauthorized("Invalid token".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_transaction_error_status() {
        let error = ApiError::Transaction("violates foreign key constraint".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_rollback_failure_is_more_severe_than_transaction_error() {
        let error = ApiError::RollbackFailed {
            original: "insert failed".to_string(),
            rollback: "connection reset".to_string(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    #[case(UploadError::UnsupportedType("text/plain".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE)]
    #[case(UploadError::TooLarge { limit: 10 }, StatusCode::PAYLOAD_TOO_LARGE)]
    #[case(UploadError::Missing("fileImage".into()), StatusCode::BAD_REQUEST)]
    fn test_upload_error_status(#[case] error: UploadError, #[case] expected: StatusCode) {
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), expected);
    }

    #[test]
    fn test_insert_error_without_unique_violation_is_internal() {
        let error = ApiError::from_insert(sqlx::Error::RowNotFound.into(), "Email already registered");
        assert!(matches!(error, ApiError::Internal(_)));

        let error = ApiError::from_insert(anyhow::anyhow!("pool closed"), "Email already registered");
        assert!(matches!(error, ApiError::Internal(_)));
    }

    #[test]
    fn test_non_database_write_error_is_not_a_transaction_error() {
        let error = ApiError::from_write(sqlx::Error::RowNotFound);
        assert!(matches!(error, ApiError::Database(_)));
    }
}
