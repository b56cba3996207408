//! User Data Structures
//!
//! Public projections of an account and the request bodies of the account
//! endpoints. Password hashes and refresh tokens never appear here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credential-free projection of a user, embedded in posts, comments and
/// notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub bio: String,
    pub link: String,
    pub profile_img: String,
    pub cover_img: String,
}

/// Full profile of a user including the derived relationship sets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub link: String,
    pub profile_img: String,
    pub cover_img: String,
    /// Users this user follows
    pub following: Vec<Uuid>,
    /// Users following this user
    pub followers: Vec<Uuid>,
    /// Posts this user has liked
    pub liked_posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration body (JSON form; the multipart form uses the same field names
/// plus `profileImg` / `coverImg` files)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Defaults to the username when omitted
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Login body: a username or an email, plus the password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Refresh body; the `refreshToken` cookie takes precedence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Profile update; absent or blank fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Access/refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a follow toggle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    Followed,
    Unfollowed,
}

impl FollowOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            FollowOutcome::Followed => "Successfully followed the user!",
            FollowOutcome::Unfollowed => "Successfully unfollowed the user!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_missing_full_name() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"ana","email":"ana@x.com","password":"secret1"}"#,
        )
        .unwrap();
        assert_eq!(req.username, "ana");
        assert!(req.full_name.is_none());
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let now = Utc::now();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            username: "ana".into(),
            email: "ana@x.com".into(),
            full_name: "Ana".into(),
            bio: String::new(),
            link: String::new(),
            profile_img: String::new(),
            cover_img: String::new(),
            following: vec![],
            followers: vec![],
            liked_posts: vec![],
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("fullName").is_some());
        assert!(value.get("likedPosts").is_some());
        assert!(value.get("password").is_none());
        assert!(value.get("passwordHash").is_none());
    }
}
