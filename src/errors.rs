// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Gallery not found: {0}")]
    NotFound(String),

    #[error("Gallery already paid: {0}")]
    AlreadyPaid(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Payment provider error: {0}")]
    PaymentError(String),

    #[error("Payment required for gallery: {0}")]
    PaymentRequired(String),

    #[error("Archive would be empty for gallery: {0}")]
    EmptyArchive(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GalleryError {
    /// HTTP status and machine-readable code for each variant
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            GalleryError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            GalleryError::AlreadyPaid(_) => (StatusCode::CONFLICT, "ALREADY_PAID"),
            GalleryError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            GalleryError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            GalleryError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            GalleryError::StorageError(_) => (StatusCode::BAD_GATEWAY, "STORAGE_ERROR"),
            GalleryError::PaymentError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PAYMENT_ERROR"),
            GalleryError::PaymentRequired(_) => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_REQUIRED"),
            GalleryError::EmptyArchive(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_ARCHIVE"),
            GalleryError::ArchiveError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ARCHIVE_ERROR"),
            GalleryError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED"),
            GalleryError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            GalleryError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message shown to API consumers
    /// Provider and archive failures are logged in full and reported generically
    pub fn public_message(&self) -> String {
        match self {
            GalleryError::PaymentError(_) => {
                "Could not create the payment session. Please try again.".to_string()
            }
            GalleryError::ArchiveError(_) => {
                "Could not prepare the download. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Convert GalleryError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for GalleryError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = self.status_and_code();

        let body = json!({
            "error": self.public_message(),
            "code": error_code,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }
}
