//! Social Domain Types
//!
//! Wire shapes for accounts, the follow graph, posts, comments, likes and
//! notifications.

/// Accounts, sessions and the follow graph
pub mod user;

/// Posts, comments and likes
pub mod post;

/// Like and follow notifications
pub mod notification;

pub use user::{
    AuthPayload, ChangePasswordRequest, FollowOutcome, LoginRequest, RefreshRequest,
    RegisterRequest, TokenPair, UpdateUserRequest, UserProfile, UserSummary,
};
pub use post::{
    CommentView, CreatePostRequest, EditCommentRequest, LikeToggle, NewCommentRequest, PostView,
};
pub use notification::{NotificationKind, NotificationView};
