//! Shared Error Types
//!
//! Error types that can be produced without a server: input validation of
//! wire types.
//!
//! # Usage
//!
//! ```rust
//! use chirp::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Invalid email format");
//! assert_eq!(error.field(), "email");
//! ```
use thiserror::Error;

/// Shared error types that can occur on either side of the API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A request field failed validation
    #[error("{message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::ValidationError { field, .. } => field,
        }
    }
}
