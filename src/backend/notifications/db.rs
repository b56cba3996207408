/**
 * Notification Store
 *
 * Like and follow events addressed to a single recipient. Rows are written by
 * the follow and like toggles inside their own transactions (see
 * [`insert_notification`]) and read back only by the recipient.
 */

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::config::begin_write;
use crate::shared::{NotificationKind, NotificationView, UserSummary};

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    to_id: Uuid,
    kind: String,
    read: bool,
    created_at: DateTime<Utc>,
    from_id: Uuid,
    from_username: String,
    from_full_name: String,
    from_email: String,
    from_bio: String,
    from_link: String,
    from_profile_img: String,
    from_cover_img: String,
}

impl NotificationRow {
    fn into_view(self) -> BackendResult<NotificationView> {
        let kind = NotificationKind::parse(&self.kind).ok_or_else(|| {
            BackendError::internal(format!("Unknown notification kind: {}", self.kind))
        })?;
        Ok(NotificationView {
            id: self.id,
            from: UserSummary {
                id: self.from_id,
                username: self.from_username,
                full_name: self.from_full_name,
                email: self.from_email,
                bio: self.from_bio,
                link: self.from_link,
                profile_img: self.from_profile_img,
                cover_img: self.from_cover_img,
            },
            to: self.to_id,
            kind,
            read: self.read,
            created_at: self.created_at,
        })
    }
}

/// Record an event on an open connection or transaction
pub async fn insert_notification(
    conn: &mut SqliteConnection,
    from: Uuid,
    to: Uuid,
    kind: NotificationKind,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO notifications (id, from_id, to_id, kind, read, created_at) \
         VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(id)
    .bind(from)
    .bind(to)
    .bind(kind.as_str())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

/// Every notification addressed to `user_id`, newest first
///
/// All of them are marked read in the same transaction. The returned list
/// shows the read flags as they were before this call.
pub async fn list_for(pool: &SqlitePool, user_id: Uuid) -> BackendResult<Vec<NotificationView>> {
    let mut tx = begin_write(pool).await?;

    let rows = sqlx::query_as::<_, NotificationRow>(
        "SELECT n.id, n.to_id, n.kind, n.read, n.created_at, \
                u.id AS from_id, u.username AS from_username, u.full_name AS from_full_name, \
                u.email AS from_email, u.bio AS from_bio, u.link AS from_link, \
                u.profile_img AS from_profile_img, u.cover_img AS from_cover_img \
         FROM notifications n JOIN users u ON u.id = n.from_id \
         WHERE n.to_id = ? \
         ORDER BY n.created_at DESC, n.rowid DESC",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query("UPDATE notifications SET read = 1 WHERE to_id = ? AND read = 0")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    rows.into_iter().map(NotificationRow::into_view).collect()
}

/// Delete one notification; only its recipient may do so
pub async fn delete_notification(
    pool: &SqlitePool,
    notification_id: Uuid,
    requester_id: Uuid,
) -> BackendResult<()> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND to_id = ?")
        .bind(notification_id)
        .bind(requester_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(BackendError::not_found("Notification not found"));
    }
    Ok(())
}
