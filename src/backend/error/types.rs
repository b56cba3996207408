/**
 * Backend Error Types
 *
 * This module defines the single error type returned by every store function
 * and HTTP handler in the backend.
 *
 * # Error Categories
 *
 * ## Client errors (4xx)
 *
 * - `Validation` / `MalformedJson` - missing or malformed input (400)
 * - `InvalidOperation` - a well-formed request that makes no sense, such as
 *   following yourself (400)
 * - `Unauthorized` / `InvalidCredentials` - missing, invalid or revoked
 *   credentials (401)
 * - `Forbidden` - acting on a resource owned by someone else (403)
 * - `NotFound` - referenced entity does not exist (404)
 * - `Conflict` - uniqueness violation (409)
 *
 * ## Server errors (5xx)
 *
 * - `Internal` and the wrapped library errors (database, hashing, I/O).
 *   Their details are logged and only exposed to clients in
 *   development mode.
 *
 * Token decoding errors are the exception: a JWT that fails to verify is a
 * client problem and maps to 401.
 */

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Backend error type
///
/// # Usage
///
/// ```rust
/// use chirp::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("Post not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
///
/// let err = BackendError::forbidden("You are not authorized to delete this post");
/// assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Missing or malformed input
    #[error("{message}")]
    Validation {
        /// Human-readable error message
        message: String,
        /// Field-level details
        errors: Vec<String>,
    },

    /// Request is well-formed but not allowed by the domain rules
    #[error("{message}")]
    InvalidOperation { message: String },

    /// Uniqueness violation
    #[error("{message}")]
    Conflict { message: String },

    /// Referenced entity does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// Requester does not own the resource
    #[error("{message}")]
    Forbidden { message: String },

    /// Missing, invalid, expired or revoked credential
    #[error("{message}")]
    Unauthorized { message: String },

    /// Password did not verify
    #[error("{message}")]
    InvalidCredentials { message: String },

    /// Anything else the server could not complete
    #[error("{message}")]
    Internal { message: String },

    /// Shared validation error
    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// JWT encoding or decoding failed
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request body that is not the expected JSON
    #[error("Malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            message: "Invalid user credentials".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// A database unique-constraint violation surfaces as 409, which covers
    /// the window between a uniqueness pre-check and the insert.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidOperation { .. } | Self::MalformedJson(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Unauthorized { .. } | Self::InvalidCredentials { .. } | Self::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Database(err) if is_unique_violation(err) => StatusCode::CONFLICT,
            Self::Internal { .. }
            | Self::Database(_)
            | Self::Migration(_)
            | Self::Hashing(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message
    ///
    /// Wrapped library errors collapse to a generic message so that SQL or
    /// file-system details do not leak into responses.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message, .. }
            | Self::InvalidOperation { message }
            | Self::Conflict { message }
            | Self::NotFound { message }
            | Self::Forbidden { message }
            | Self::Unauthorized { message }
            | Self::InvalidCredentials { message }
            | Self::Internal { message } => message.clone(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::MalformedJson(_) => "Invalid request body".to_string(),
            Self::Token(_) => "Invalid or expired token".to_string(),
            Self::Database(err) if is_unique_violation(err) => {
                "Resource already exists".to_string()
            }
            _ => "Internal server error".to_string(),
        }
    }

    /// Field-level details for the `errors` array of the envelope
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Validation { errors, .. } => errors.clone(),
            Self::MalformedJson(err) => vec![err.to_string()],
            Self::SharedError(SharedError::ValidationError { field, .. }) => vec![field.clone()],
            _ => Vec::new(),
        }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_error) if db_error.is_unique_violation())
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            message: "Invalid request body".to_string(),
            errors: vec![rejection.body_text()],
        }
    }
}

impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation {
            message: "Invalid path parameter".to_string(),
            errors: vec![rejection.body_text()],
        }
    }
}

impl From<MultipartRejection> for BackendError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Validation {
            message: "Invalid multipart body".to_string(),
            errors: vec![rejection.body_text()],
        }
    }
}

impl From<MultipartError> for BackendError {
    fn from(err: MultipartError) -> Self {
        Self::Validation {
            message: "Invalid multipart body".to_string(),
            errors: vec![err.body_text()],
        }
    }
}
