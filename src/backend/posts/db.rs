/**
 * Content Store
 *
 * Posts, comments and likes. Likes are stored once per (post, user) pair in
 * `post_likes`; both a post's like list and a user's liked posts are read
 * from that table.
 *
 * Read paths live in `posts::feed`; every function here that returns a post
 * goes through the same hydration as the feeds.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::require_user;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::notifications::db::insert_notification;
use crate::backend::posts::feed::hydrate_posts;
use crate::backend::server::config::begin_write;
use crate::shared::validation::non_blank;
use crate::shared::{CommentView, LikeToggle, NotificationKind, PostView};

pub(crate) const POST_COLUMNS: &str = "id, author_id, text, img, created_at, updated_at";

/// Post row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub img: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn get_post(pool: &SqlitePool, post_id: Uuid) -> Result<Option<PostRow>, sqlx::Error> {
    sqlx::query_as::<_, PostRow>(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

pub async fn require_post(pool: &SqlitePool, post_id: Uuid) -> BackendResult<PostRow> {
    get_post(pool, post_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))
}

/// Create a post with text, an image URL, or both
///
/// # Errors
///
/// * `Validation` - text is blank and there is no image
/// * `NotFound` - author does not exist
pub async fn create_post(
    pool: &SqlitePool,
    author_id: Uuid,
    text: Option<&str>,
    img: Option<String>,
) -> BackendResult<PostView> {
    let text = non_blank(text);
    let img = non_blank(img.as_deref());
    if text.is_none() && img.is_none() {
        return Err(BackendError::validation(
            "At least post text message or an image is required",
        ));
    }
    require_user(pool, author_id).await?;

    let now = Utc::now();
    let row = sqlx::query_as::<_, PostRow>(&format!(
        "INSERT INTO posts (id, author_id, text, img, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
        POST_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(text.unwrap_or_default())
    .bind(img.unwrap_or_default())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::info!("User {} created post {}", author_id, row.id);
    single(hydrate_posts(pool, vec![row]).await?)
}

/// Delete a post together with its comments and likes
///
/// Returns the deleted row so the caller can release its image.
///
/// # Errors
///
/// * `NotFound` - no such post
/// * `Forbidden` - requester is not the author
pub async fn delete_post(
    pool: &SqlitePool,
    post_id: Uuid,
    requester_id: Uuid,
) -> BackendResult<PostRow> {
    let post = require_post(pool, post_id).await?;
    if post.author_id != requester_id {
        return Err(BackendError::forbidden("You are not authorized to delete this post"));
    }

    let mut tx = begin_write(pool).await?;
    sqlx::query("DELETE FROM post_likes WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM comments WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("User {} deleted post {}", requester_id, post_id);
    Ok(post)
}

async fn comment_view(pool: &SqlitePool, row: CommentRow) -> BackendResult<CommentView> {
    let author = require_user(pool, row.author_id).await?;
    Ok(CommentView {
        id: row.id,
        text: row.text,
        user: author.summary(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Append a comment to a post
pub async fn add_comment(
    pool: &SqlitePool,
    post_id: Uuid,
    author_id: Uuid,
    text: &str,
) -> BackendResult<CommentView> {
    let text = non_blank(Some(text))
        .ok_or_else(|| BackendError::validation("Text field is required"))?;
    require_post(pool, post_id).await?;
    require_user(pool, author_id).await?;

    let now = Utc::now();
    let row = sqlx::query_as::<_, CommentRow>(
        "INSERT INTO comments (id, post_id, author_id, text, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id, post_id, author_id, text, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(post_id)
    .bind(author_id)
    .bind(&text)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    comment_view(pool, row).await
}

/// Change the text of a comment
///
/// # Errors
///
/// * `Validation` - blank text
/// * `NotFound` - no such post, or no such comment on that post
/// * `Forbidden` - requester did not write the comment
pub async fn edit_comment(
    pool: &SqlitePool,
    post_id: Uuid,
    comment_id: Uuid,
    requester_id: Uuid,
    text: &str,
) -> BackendResult<CommentView> {
    let text = non_blank(Some(text))
        .ok_or_else(|| BackendError::validation("Text field is required"))?;
    require_post(pool, post_id).await?;

    let comment = sqlx::query_as::<_, CommentRow>(
        "SELECT id, post_id, author_id, text, created_at, updated_at FROM comments WHERE id = ?",
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?
    .filter(|c| c.post_id == post_id)
    .ok_or_else(|| BackendError::not_found("Comment not found"))?;

    if comment.author_id != requester_id {
        return Err(BackendError::forbidden("You are not authorized to update this comment"));
    }

    let row = sqlx::query_as::<_, CommentRow>(
        "UPDATE comments SET text = ?, updated_at = ? WHERE id = ? \
         RETURNING id, post_id, author_id, text, created_at, updated_at",
    )
    .bind(&text)
    .bind(Utc::now())
    .bind(comment_id)
    .fetch_one(pool)
    .await?;

    comment_view(pool, row).await
}

/// Like the post if `user_id` has not liked it yet, unlike it otherwise
///
/// A like notifies the post author (self-likes included); an unlike does
/// not. The like edge and the notification commit together.
pub async fn toggle_like(
    pool: &SqlitePool,
    post_id: Uuid,
    user_id: Uuid,
) -> BackendResult<LikeToggle> {
    let post = require_post(pool, post_id).await?;
    require_user(pool, user_id).await?;

    let mut tx = begin_write(pool).await?;

    let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let liked = removed == 0;
    if liked {
        sqlx::query("INSERT INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(post_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        insert_notification(&mut *tx, user_id, post.author_id, NotificationKind::Like).await?;
    }

    let likes: Vec<Uuid> = sqlx::query_scalar(
        "SELECT user_id FROM post_likes WHERE post_id = ? ORDER BY created_at, rowid",
    )
    .bind(post_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let action = if liked { "liked" } else { "unliked" };
    tracing::debug!("User {} {} post {}", user_id, action, post_id);
    Ok(LikeToggle { liked, likes })
}

/// Hydrated view of a single post
pub async fn post_view(pool: &SqlitePool, post_id: Uuid) -> BackendResult<PostView> {
    let row = require_post(pool, post_id).await?;
    single(hydrate_posts(pool, vec![row]).await?)
}

fn single(mut posts: Vec<PostView>) -> BackendResult<PostView> {
    posts
        .pop()
        .ok_or_else(|| BackendError::internal("Post could not be loaded"))
}
