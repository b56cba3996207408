/**
 * Follow Graph Database Operations
 *
 * The follow relationship is stored once per directed edge in `follows`.
 * `following(u)` and `followers(u)` are the two directions of the same rows,
 * so they cannot disagree.
 */

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::notifications::db::insert_notification;
use crate::backend::server::config::begin_write;
use crate::shared::{FollowOutcome, NotificationKind, UserSummary};

/// Default size of the suggestion sample
pub const DEFAULT_SUGGESTIONS: i64 = 10;

/// Follow `target_id` if `actor_id` does not follow it yet, unfollow otherwise
///
/// The edge change and the follow notification commit together. Unfollowing
/// creates no notification.
///
/// # Errors
///
/// * `InvalidOperation` - actor and target are the same user
/// * `NotFound` - either user does not exist
pub async fn follow_toggle(
    pool: &SqlitePool,
    actor_id: Uuid,
    target_id: Uuid,
) -> BackendResult<FollowOutcome> {
    if actor_id == target_id {
        return Err(BackendError::invalid_operation("You can't follow/unfollow yourself"));
    }
    if get_user_by_id(pool, actor_id).await?.is_none()
        || get_user_by_id(pool, target_id).await?.is_none()
    {
        return Err(BackendError::not_found("User not found"));
    }

    let mut tx = begin_write(pool).await?;

    let removed = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
        .bind(actor_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let outcome = if removed > 0 {
        FollowOutcome::Unfollowed
    } else {
        sqlx::query("INSERT INTO follows (follower_id, followee_id, created_at) VALUES (?, ?, ?)")
            .bind(actor_id)
            .bind(target_id)
            .bind(chrono::Utc::now())
            .execute(&mut *tx)
            .await?;
        insert_notification(&mut *tx, actor_id, target_id, NotificationKind::Follow).await?;
        FollowOutcome::Followed
    };

    tx.commit().await?;

    tracing::info!("User {} {:?} user {}", actor_id, outcome, target_id);
    Ok(outcome)
}

/// Random sample of up to `count` users that `user_id` does not follow yet,
/// never including `user_id` itself
pub async fn suggest_users(
    pool: &SqlitePool,
    user_id: Uuid,
    count: i64,
) -> BackendResult<Vec<UserSummary>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, full_name, bio, link, profile_img, \
                cover_img, created_at, updated_at \
         FROM users \
         WHERE id <> ? \
           AND id NOT IN (SELECT followee_id FROM follows WHERE follower_id = ?) \
         ORDER BY RANDOM() \
         LIMIT ?",
    )
    .bind(user_id)
    .bind(user_id)
    .bind(count.max(0))
    .fetch_all(pool)
    .await?;

    Ok(users.iter().map(User::summary).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::load_profile;
    use crate::backend::notifications::db::list_for;
    use crate::backend::test_support::{create_user, test_pool};
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_follow_then_unfollow() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let bob = create_user(&pool, "bob").await;

        assert_eq!(
            follow_toggle(&pool, ana.id, bob.id).await.unwrap(),
            FollowOutcome::Followed
        );
        let ana_profile = load_profile(&pool, &ana).await.unwrap();
        let bob_profile = load_profile(&pool, &bob).await.unwrap();
        assert_eq!(ana_profile.following, vec![bob.id]);
        assert_eq!(bob_profile.followers, vec![ana.id]);

        assert_eq!(
            follow_toggle(&pool, ana.id, bob.id).await.unwrap(),
            FollowOutcome::Unfollowed
        );
        assert!(load_profile(&pool, &ana).await.unwrap().following.is_empty());
        assert!(load_profile(&pool, &bob).await.unwrap().followers.is_empty());

        let notifications = list_for(&pool, bob.id).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Follow);
        assert_eq!(notifications[0].from.id, ana.id);
    }

    #[tokio::test]
    async fn test_follow_self_rejected() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;

        assert_matches!(
            follow_toggle(&pool, ana.id, ana.id).await,
            Err(BackendError::InvalidOperation { .. })
        );
    }

    #[tokio::test]
    async fn test_follow_missing_user() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;

        assert_matches!(
            follow_toggle(&pool, ana.id, Uuid::new_v4()).await,
            Err(BackendError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_suggestions_exclude_self_and_followed() {
        let pool = test_pool().await;
        let ana = create_user(&pool, "ana").await;
        let bob = create_user(&pool, "bob").await;
        let cid = create_user(&pool, "cid").await;
        follow_toggle(&pool, ana.id, bob.id).await.unwrap();

        let suggested = suggest_users(&pool, ana.id, DEFAULT_SUGGESTIONS).await.unwrap();
        let ids: Vec<Uuid> = suggested.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![cid.id]);

        assert_eq!(suggest_users(&pool, bob.id, 1).await.unwrap().len(), 1);
    }
}
