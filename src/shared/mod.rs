//! Shared Module
//!
//! Types and data structures shared between the HTTP layer and any client of
//! the API. Everything here is plain serde data: request bodies, response
//! shapes and the response envelope, plus the input validation rules that both
//! sides can apply before a request is made.
//!
//! # Module Structure
//!
//! ```text
//! shared/
//! ├── mod.rs         - Module exports
//! ├── error.rs       - SharedError (validation, serialization)
//! ├── envelope.rs    - ApiResponse / ApiErrorBody wire envelope
//! ├── validation.rs  - Field validation helpers
//! └── social/        - Users, posts, comments, notifications
//! ```
//!
//! Wire shapes use camelCase field names (`fullName`, `profileImg`,
//! `likedPosts`, `createdAt`). Credential fields are never part of any type in
//! this module.

/// Shared error types
pub mod error;

/// Response envelope
pub mod envelope;

/// Input validation rules
pub mod validation;

/// Social domain wire types
pub mod social;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use envelope::{ApiErrorBody, ApiResponse};
pub use social::{
    AuthPayload, ChangePasswordRequest, CommentView, CreatePostRequest, EditCommentRequest,
    FollowOutcome, LikeToggle, LoginRequest, NewCommentRequest, NotificationKind,
    NotificationView, PostView, RefreshRequest, RegisterRequest, TokenPair, UpdateUserRequest,
    UserProfile, UserSummary,
};
