/**
 * Notification Handlers
 *
 * - GET    /api/v1/notifications
 * - DELETE /api/v1/notifications/{id}
 */

use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::notifications::db::{delete_notification as remove_notification, list_for};
use crate::backend::server::state::AppState;
use crate::shared::{ApiResponse, NotificationView};

/// The caller's notifications, newest first; fetching marks them read
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<ApiResponse<Vec<NotificationView>>> {
    let notifications = list_for(&state.db_pool, user.user_id).await?;
    Ok(ApiResponse::ok(notifications, "Notifications fetched successfully"))
}

/// Delete one of the caller's notifications
///
/// # Errors
///
/// * `404 Not Found` - no such notification, or it is addressed to someone else
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, BackendError>,
) -> BackendResult<ApiResponse<()>> {
    remove_notification(&state.db_pool, id, user.user_id).await?;
    Ok(ApiResponse::message_only("Notification deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::marker::PhantomData;
    use crate::backend::graph::db::follow_toggle;
    use crate::backend::test_support::{auth_user, create_user, test_state};
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_only_recipient_deletes() {
        let (state, _dir) = test_state().await;
        let ana = create_user(&state.db_pool, "ana").await;
        let bob = create_user(&state.db_pool, "bob").await;
        follow_toggle(&state.db_pool, bob.id, ana.id).await.unwrap();

        let listed = get_notifications(State(state.clone()), auth_user(&ana))
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].from.id, bob.id);
        let id = listed[0].id;

        let path = || WithRejection(Path(id), PhantomData);
        assert_matches!(
            delete_notification(State(state.clone()), auth_user(&bob), path()).await,
            Err(BackendError::NotFound { .. })
        );
        delete_notification(State(state.clone()), auth_user(&ana), path()).await.unwrap();

        let listed = get_notifications(State(state), auth_user(&ana)).await.unwrap().data.unwrap();
        assert!(listed.is_empty());
    }
}
