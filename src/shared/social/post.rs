//! Post Data Structures
//!
//! Hydrated posts as returned by every feed, plus the request bodies of the
//! post endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::social::user::UserSummary;

/// A comment with its author embedded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub user: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post with author, likes and comments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    /// Author
    pub user: UserSummary,
    pub text: String,
    /// Image URL, empty when the post has none
    pub img: String,
    /// Ids of users who liked the post
    pub likes: Vec<Uuid>,
    /// Oldest first
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JSON body of `POST /posts/create`; images go through the multipart form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCommentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCommentRequest {
    pub comment_id: Uuid,
    #[serde(default)]
    pub text: String,
}

/// Result of a like toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeToggle {
    /// Whether the post is liked by the caller after the toggle
    pub liked: bool,
    /// The post's resulting like set
    pub likes: Vec<Uuid>,
}

impl LikeToggle {
    pub fn message(&self) -> &'static str {
        if self.liked {
            "Post liked successfully"
        } else {
            "Post unliked successfully"
        }
    }
}
