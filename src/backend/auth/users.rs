/**
 * User Model and Database Operations
 *
 * Accounts: registration, credential checks, password changes and profile
 * edits. The follow graph lives in `backend::graph`; the derived sets shown on
 * a profile (following, followers, liked posts) are read from the edge tables
 * here when a profile is assembled.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::validation::{
    non_blank, normalize_username, require_non_blank, validate_email, validate_password,
};
use crate::shared::{UserProfile, UserSummary};

const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, bio, link, \
                            profile_img, cover_img, created_at, updated_at";

/// User row
///
/// Carries the password hash, so it is never serialized directly; use
/// [`User::summary`] or [`load_profile`] for anything leaving the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    /// Lower-cased, unique
    pub username: String,
    /// Unique, compared as stored
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
    pub full_name: String,
    pub bio: String,
    pub link: String,
    pub profile_img: String,
    pub cover_img: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Credential-free projection
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            link: self.link.clone(),
            profile_img: self.profile_img.clone(),
            cover_img: self.cover_img.clone(),
        }
    }
}

/// Registration input
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub profile_img: Option<String>,
    pub cover_img: Option<String>,
}

/// Profile fields to change; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub link: Option<String>,
    pub profile_img: Option<String>,
    pub cover_img: Option<String>,
}

pub fn hash_password(password: &str, cost: u32) -> BackendResult<String> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> BackendResult<bool> {
    Ok(bcrypt::verify(password, password_hash)?)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS))
        .bind(username.trim().to_lowercase())
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
        .bind(email.trim())
        .fetch_optional(pool)
        .await
}

/// Load a user or fail with `NotFound`
pub async fn require_user(pool: &SqlitePool, id: Uuid) -> BackendResult<User> {
    get_user_by_id(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

/// Register a new account
///
/// # Errors
///
/// * `Validation` - blank username/email/password/fullName, malformed email,
///   password shorter than six characters
/// * `Conflict` - username (after lower-casing) or email already taken
pub async fn register_user(pool: &SqlitePool, new_user: NewUser, cost: u32) -> BackendResult<User> {
    let username = normalize_username(&new_user.username)?;
    let email = validate_email(&new_user.email)?;
    validate_password(&new_user.password)?;
    let full_name = match new_user.full_name.as_deref() {
        Some(name) => require_non_blank("fullName", name)?,
        None => username.clone(),
    };

    let (taken,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ? OR email = ?")
            .bind(&username)
            .bind(&email)
            .fetch_one(pool)
            .await?;
    if taken > 0 {
        return Err(BackendError::conflict("User with email or username already exists"));
    }

    let password_hash = hash_password(&new_user.password, cost)?;
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, username, email, password_hash, full_name, bio, link, \
         profile_img, cover_img, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, '', '', ?, ?, ?, ?) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(&full_name)
    .bind(new_user.profile_img.unwrap_or_default())
    .bind(new_user.cover_img.unwrap_or_default())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}

/// Check credentials given a username or an email
///
/// # Errors
///
/// * `Validation` - neither username nor email supplied
/// * `NotFound` - no matching account
/// * `InvalidCredentials` - password does not verify
pub async fn authenticate(
    pool: &SqlitePool,
    username: Option<&str>,
    email: Option<&str>,
    password: &str,
) -> BackendResult<User> {
    let username = non_blank(username).map(|u| u.to_lowercase());
    let email = non_blank(email);
    if username.is_none() && email.is_none() {
        return Err(BackendError::validation("Username or email is required"));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = ? OR email = ? LIMIT 1",
        USER_COLUMNS
    ))
    .bind(username.as_deref())
    .bind(email.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| BackendError::not_found("User does not exist"))?;

    if !verify_password(password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(BackendError::invalid_credentials());
    }

    Ok(user)
}

/// Replace the password after checking the current one
pub async fn change_password(
    pool: &SqlitePool,
    user_id: Uuid,
    old_password: &str,
    new_password: &str,
    cost: u32,
) -> BackendResult<()> {
    let user = require_user(pool, user_id).await?;
    if !verify_password(old_password, &user.password_hash)? {
        return Err(BackendError::unauthorized("Invalid old password"));
    }
    validate_password(new_password)?;

    let password_hash = hash_password(new_password, cost)?;
    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(&password_hash)
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;

    tracing::info!("Password changed for user {}", user_id);
    Ok(())
}

/// Apply profile changes
///
/// Blank values are ignored. A new email must be well-formed; a new email or
/// username must not belong to another account.
pub async fn update_user(
    pool: &SqlitePool,
    user_id: Uuid,
    changes: ProfileChanges,
) -> BackendResult<User> {
    let mut user = require_user(pool, user_id).await?;

    if let Some(email) = non_blank(changes.email.as_deref()) {
        let email = validate_email(&email)?;
        if email != user.email {
            if let Some(other) = get_user_by_email(pool, &email).await? {
                if other.id != user.id {
                    return Err(BackendError::conflict("Email already exists"));
                }
            }
            user.email = email;
        }
    }

    if let Some(username) = non_blank(changes.username.as_deref()) {
        let username = normalize_username(&username)?;
        if username != user.username {
            if let Some(other) = get_user_by_username(pool, &username).await? {
                if other.id != user.id {
                    return Err(BackendError::conflict("Username already exists"));
                }
            }
            user.username = username;
        }
    }

    if let Some(full_name) = non_blank(changes.full_name.as_deref()) {
        user.full_name = full_name;
    }
    if let Some(bio) = non_blank(changes.bio.as_deref()) {
        user.bio = bio;
    }
    if let Some(link) = non_blank(changes.link.as_deref()) {
        user.link = link;
    }
    if let Some(img) = changes.profile_img {
        user.profile_img = img;
    }
    if let Some(img) = changes.cover_img {
        user.cover_img = img;
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET username = ?, email = ?, full_name = ?, bio = ?, link = ?, \
         profile_img = ?, cover_img = ?, updated_at = ? WHERE id = ? RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.full_name)
    .bind(&user.bio)
    .bind(&user.link)
    .bind(&user.profile_img)
    .bind(&user.cover_img)
    .bind(Utc::now())
    .bind(user.id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Assemble the public profile of `user`, including the derived sets
pub async fn load_profile(pool: &SqlitePool, user: &User) -> BackendResult<UserProfile> {
    let following: Vec<Uuid> = sqlx::query_scalar(
        "SELECT followee_id FROM follows WHERE follower_id = ? ORDER BY created_at, rowid",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;

    let followers: Vec<Uuid> = sqlx::query_scalar(
        "SELECT follower_id FROM follows WHERE followee_id = ? ORDER BY created_at, rowid",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;

    let liked_posts: Vec<Uuid> = sqlx::query_scalar(
        "SELECT post_id FROM post_likes WHERE user_id = ? ORDER BY created_at, rowid",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;

    Ok(UserProfile {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        bio: user.bio.clone(),
        link: user.link.clone(),
        profile_img: user.profile_img.clone(),
        cover_img: user.cover_img.clone(),
        following,
        followers,
        liked_posts,
        created_at: user.created_at,
        updated_at: user.updated_at,
    })
}

/// Profile of the user with the given username
pub async fn profile_by_username(pool: &SqlitePool, username: &str) -> BackendResult<UserProfile> {
    let user = get_user_by_username(pool, username)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    load_profile(pool, &user).await
}
