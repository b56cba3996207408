//! Backend Error Module
//!
//! One error type for the whole backend and its conversion into the failure
//! envelope.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError, constructors, status mapping
//! └── conversion.rs - IntoResponse for errors and success envelopes
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use chirp::backend::error::BackendError;
//! use chirp::shared::ApiResponse;
//!
//! async fn handler() -> Result<ApiResponse<()>, BackendError> {
//!     Err(BackendError::not_found("User not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Envelope conversion
pub mod conversion;

pub use conversion::ErrorDetails;
pub use types::BackendError;

/// Result alias used by stores and handlers
pub type BackendResult<T> = Result<T, BackendError>;
