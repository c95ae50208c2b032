//! Error types for the Diet Tracker application

use thiserror::Error;

/// Errors raised while parsing shared domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown user type: {0}")]
    UnknownUserType(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),
}
