//! Error handling utilities for API responses.
//!
//! Provides the standard response envelope and the single conversion from
//! service-layer errors to HTTP responses.
//!
//! # Response Format
//! All responses share one JSON shape containing:
//! - `success`: whether the request succeeded
//! - `data`: payload on success
//! - `message`: human-readable message
//! - `error.error_type`: machine-readable error category on failure
//!
//! # Error Handling Flow
//! 1. Service layer returns a precise `ServiceError`
//! 2. `service_error_to_http` logs the precise cause and converts it to a
//!    deliberately generic HTTP response
//!
//! Credential failures and store failures never reveal their cause: an
//! unknown username looks exactly like a wrong password, and a taken
//! username looks exactly like a database outage during registration.

use crate::errors::ServiceError;
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const USER_CREATION_FAILED_MESSAGE: &str = "Could not create user";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Response timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful response that carries no data
    pub fn message(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: true,
            data: None,
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>, error_type: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error half of every handler's return type
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Wraps an error envelope into the `(status, body)` pair handlers return
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    error_type: &str,
) -> ApiError {
    (status, Json(ApiResponse::<()>::error(message, error_type)))
}

/// The one response every rejected session gets
pub fn unauthorized() -> ApiError {
    error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE, "unauthorized")
}

/// A request body that is not JSON, or not the expected shape, is a
/// validation error like any other.
pub fn json_rejection_to_http(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Rejected request body ({}): {}", rejection.status(), rejection.body_text());
    service_error_to_http(ServiceError::validation(rejection.body_text()))
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    match error {
        ServiceError::Validation { message } => {
            error_response(StatusCode::BAD_REQUEST, message, "validation_error")
        }
        ServiceError::InvalidCredentials { reason } => {
            tracing::debug!("Login rejected: {}", reason);
            error_response(
                StatusCode::UNAUTHORIZED,
                INVALID_CREDENTIALS_MESSAGE,
                "invalid_credentials",
            )
        }
        ServiceError::UserCreationFailed { source } => {
            tracing::error!("User creation failed: {}", source);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                USER_CREATION_FAILED_MESSAGE,
                "user_creation_failed",
            )
        }
        ServiceError::Store { source } => {
            tracing::error!("Store error: {}", source);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE,
                "internal_error",
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE,
                "internal_error",
            )
        }
    }
}
