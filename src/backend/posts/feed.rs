/**
 * Feed Composer
 *
 * Turns a viewer and a [`FeedMode`] into an ordered list of hydrated posts.
 *
 * Every feed is ordered newest first, with insertion order breaking ties
 * between posts created in the same instant. Hydration loads likes, comments
 * and the users they reference with one batched query each, whatever the
 * number of posts.
 */

use std::collections::{HashMap, HashSet};

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_username, require_user, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::posts::db::{CommentRow, PostRow, POST_COLUMNS};
use crate::shared::{CommentView, PostView, UserSummary};

/// Which posts a feed contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMode {
    /// Every post
    All,
    /// Posts by users the viewer follows
    Following,
    /// Posts authored by the user with this username
    ByUser(String),
    /// Posts liked by this user
    Liked(Uuid),
}

/// Compose the feed `mode` as seen by `viewer_id`
///
/// # Errors
///
/// * `NotFound` - the viewer (for `Following`), the username (for `ByUser`)
///   or the user (for `Liked`) does not exist
pub async fn compose_feed(
    pool: &SqlitePool,
    viewer_id: Uuid,
    mode: FeedMode,
) -> BackendResult<Vec<PostView>> {
    let rows = match mode {
        FeedMode::All => {
            sqlx::query_as::<_, PostRow>(&format!(
                "SELECT {} FROM posts ORDER BY created_at DESC, rowid DESC",
                POST_COLUMNS
            ))
            .fetch_all(pool)
            .await?
        }
        FeedMode::Following => {
            require_user(pool, viewer_id).await?;
            sqlx::query_as::<_, PostRow>(&format!(
                "SELECT {} FROM posts \
                 WHERE author_id IN (SELECT followee_id FROM follows WHERE follower_id = ?) \
                 ORDER BY created_at DESC, rowid DESC",
                POST_COLUMNS
            ))
            .bind(viewer_id)
            .fetch_all(pool)
            .await?
        }
        FeedMode::ByUser(username) => {
            let author = get_user_by_username(pool, &username)
                .await?
                .ok_or_else(|| BackendError::not_found("User not found"))?;
            sqlx::query_as::<_, PostRow>(&format!(
                "SELECT {} FROM posts WHERE author_id = ? ORDER BY created_at DESC, rowid DESC",
                POST_COLUMNS
            ))
            .bind(author.id)
            .fetch_all(pool)
            .await?
        }
        FeedMode::Liked(user_id) => {
            require_user(pool, user_id).await?;
            sqlx::query_as::<_, PostRow>(
                "SELECT p.id, p.author_id, p.text, p.img, p.created_at, p.updated_at \
                 FROM posts p JOIN post_likes l ON l.post_id = p.id \
                 WHERE l.user_id = ? \
                 ORDER BY p.created_at DESC, p.rowid DESC",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };

    hydrate_posts(pool, rows).await
}

fn push_id_list<'args>(builder: &mut QueryBuilder<'args, Sqlite>, ids: &[Uuid]) {
    builder.push(" (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

async fn load_users(pool: &SqlitePool, ids: &[Uuid]) -> BackendResult<HashMap<Uuid, UserSummary>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, username, email, password_hash, full_name, bio, link, profile_img, \
         cover_img, created_at, updated_at FROM users WHERE id IN",
    );
    push_id_list(&mut builder, ids);
    let users = builder.build_query_as::<User>().fetch_all(pool).await?;
    Ok(users.iter().map(|u| (u.id, u.summary())).collect())
}

/// Attach authors, likes and comments to post rows, keeping their order
pub async fn hydrate_posts(pool: &SqlitePool, rows: Vec<PostRow>) -> BackendResult<Vec<PostView>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let post_ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();

    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT post_id, user_id FROM post_likes WHERE post_id IN");
    push_id_list(&mut builder, &post_ids);
    builder.push(" ORDER BY created_at, rowid");
    let like_rows = builder.build_query_as::<(Uuid, Uuid)>().fetch_all(pool).await?;

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, post_id, author_id, text, created_at, updated_at \
         FROM comments WHERE post_id IN",
    );
    push_id_list(&mut builder, &post_ids);
    builder.push(" ORDER BY created_at, rowid");
    let comment_rows = builder.build_query_as::<CommentRow>().fetch_all(pool).await?;

    let mut user_ids: Vec<Uuid> = Vec::new();
    let mut seen = HashSet::new();
    for id in rows
        .iter()
        .map(|p| p.author_id)
        .chain(comment_rows.iter().map(|c| c.author_id))
    {
        if seen.insert(id) {
            user_ids.push(id);
        }
    }
    let users = load_users(pool, &user_ids).await?;

    let mut likes: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (post_id, user_id) in like_rows {
        likes.entry(post_id).or_default().push(user_id);
    }

    let mut comments: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for row in comment_rows {
        let Some(user) = users.get(&row.author_id) else {
            tracing::warn!("Comment {} references missing user {}", row.id, row.author_id);
            continue;
        };
        comments.entry(row.post_id).or_default().push(CommentView {
            id: row.id,
            text: row.text,
            user: user.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        });
    }

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(author) = users.get(&row.author_id) else {
            tracing::warn!("Post {} references missing user {}", row.id, row.author_id);
            continue;
        };
        posts.push(PostView {
            id: row.id,
            user: author.clone(),
            text: row.text,
            img: row.img,
            likes: likes.remove(&row.id).unwrap_or_default(),
            comments: comments.remove(&row.id).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        });
    }
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::graph::db::follow_toggle;
    use crate::backend::posts::db::{add_comment, create_post, delete_post, toggle_like};
    use crate::backend::test_support::{create_user, test_pool};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn ids(posts: &[PostView]) -> Vec<Uuid> {
        posts.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_all_is_newest_first() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let first = create_post(&pool, ana.id, Some("one"), None).await.unwrap();
        let second = create_post(&pool, ana.id, Some("two"), None).await.unwrap();
        let third = create_post(&pool, ana.id, Some("three"), None).await.unwrap();

        let feed = compose_feed(&pool, ana.id, FeedMode::All).await.unwrap();
        assert_eq!(ids(&feed), vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_by_user_only_returns_that_author() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let bob = create_user(&pool, "bob").await;
        let a1 = create_post(&pool, ana.id, Some("a1"), None).await.unwrap();
        create_post(&pool, bob.id, Some("b1"), None).await.unwrap();
        let a2 = create_post(&pool, ana.id, Some("a2"), None).await.unwrap();

        let feed = compose_feed(&pool, bob.id, FeedMode::ByUser("ANA".into())).await.unwrap();
        assert_eq!(ids(&feed), vec![a2.id, a1.id]);
        assert!(feed.iter().all(|p| p.user.id == ana.id));

        assert_matches!(
            compose_feed(&pool, bob.id, FeedMode::ByUser("ghost".into())).await,
            Err(BackendError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_following_feed() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let bob = create_user(&pool, "bob").await;
        let cid = create_user(&pool, "cid").await;
        let by_bob = create_post(&pool, bob.id, Some("bob"), None).await.unwrap();
        create_post(&pool, cid.id, Some("cid"), None).await.unwrap();
        create_post(&pool, ana.id, Some("ana"), None).await.unwrap();

        assert!(compose_feed(&pool, ana.id, FeedMode::Following).await.unwrap().is_empty());

        follow_toggle(&pool, ana.id, bob.id).await.unwrap();
        let feed = compose_feed(&pool, ana.id, FeedMode::Following).await.unwrap();
        assert_eq!(ids(&feed), vec![by_bob.id]);
    }

    #[tokio::test]
    async fn test_liked_feed_matches_liked_posts() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let bob = create_user(&pool, "bob").await;
        let p1 = create_post(&pool, ana.id, Some("p1"), None).await.unwrap();
        create_post(&pool, ana.id, Some("p2"), None).await.unwrap();
        let p3 = create_post(&pool, ana.id, Some("p3"), None).await.unwrap();
        toggle_like(&pool, p1.id, bob.id).await.unwrap();
        toggle_like(&pool, p3.id, bob.id).await.unwrap();

        let feed = compose_feed(&pool, ana.id, FeedMode::Liked(bob.id)).await.unwrap();
        assert_eq!(ids(&feed), vec![p3.id, p1.id]);
        assert!(feed.iter().all(|p| p.likes.contains(&bob.id)));

        assert_matches!(
            compose_feed(&pool, ana.id, FeedMode::Liked(Uuid::new_v4())).await,
            Err(BackendError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_hydration_embeds_comment_authors() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let bob = create_user(&pool, "bob").await;
        let post = create_post(&pool, ana.id, Some("hello"), None).await.unwrap();
        add_comment(&pool, post.id, bob.id, "first").await.unwrap();
        add_comment(&pool, post.id, ana.id, "second").await.unwrap();

        let feed = compose_feed(&pool, ana.id, FeedMode::All).await.unwrap();
        let texts: Vec<&str> = feed[0].comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(feed[0].comments[0].user.username, "bob");
    }

    #[tokio::test]
    async fn test_deleted_post_leaves_every_feed() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let bob = create_user(&pool, "bob").await;
        follow_toggle(&pool, bob.id, ana.id).await.unwrap();
        let post = create_post(&pool, ana.id, Some("bye"), None).await.unwrap();
        toggle_like(&pool, post.id, bob.id).await.unwrap();

        delete_post(&pool, post.id, ana.id).await.unwrap();

        for mode in [
            FeedMode::All,
            FeedMode::Following,
            FeedMode::ByUser("ana".into()),
            FeedMode::Liked(bob.id),
        ] {
            assert!(compose_feed(&pool, bob.id, mode).await.unwrap().is_empty());
        }
    }
}
