//! Global application error types.
//!
//! Internal code keeps precise error kinds so that failures can be logged
//! with their real cause. The conversion to client-facing responses happens
//! in one place, `api::common::service_error_to_http`, which deliberately
//! collapses several of these kinds into the same generic message.

use thiserror::Error;
use validator::ValidationErrors;

/// Errors raised by a credential store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique constraint on `users.username` rejected the insert.
    #[error("username already taken: {username}")]
    DuplicateUsername { username: String },

    /// Any other failure reported by the database driver.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors produced by session token issuance and verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token uses an unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("token expired at {expired_at}")]
    Expired { expired_at: i64 },

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Service-level error shared by the auth orchestration and the HTTP handlers
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Unknown username or wrong password. `reason` is for logs only.
    #[error("Invalid credentials: {reason}")]
    InvalidCredentials { reason: String },

    /// Registration could not persist the user, whatever the store said.
    #[error("User creation failed: {source}")]
    UserCreationFailed { source: StoreError },

    #[error("Store error: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_credentials(reason: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            reason: reason.into(),
        }
    }

    pub fn user_creation_failed(source: StoreError) -> Self {
        Self::UserCreationFailed { source }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Flattens `validator` output into a single `field: message` list.
    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        messages.sort();

        Self::validation(messages.join(", "))
    }
}
