/**
 * Current User Handlers
 *
 * - GET  /api/v1/users/me - profile of the signed-in user
 * - POST /api/v1/users/change-password - replace the password
 *
 * Both sit behind the auth middleware; the user comes from [`AuthUser`].
 */

use axum::extract::State;
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::backend::auth::users::{change_password as store_password, load_profile, require_user};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{ApiResponse, ChangePasswordRequest, UserProfile};

/// Get current user handler
///
/// # Errors
///
/// * `404 Not Found` - the account was removed after the token was issued
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<ApiResponse<UserProfile>> {
    let user = require_user(&state.db_pool, user.user_id).await?;
    let profile = load_profile(&state.db_pool, &user).await?;
    Ok(ApiResponse::ok(profile, "Current user fetched successfully"))
}

/// Change password handler
///
/// # Errors
///
/// * `401 Unauthorized` - old password does not match
/// * `400 Bad Request` - new password shorter than six characters
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Json(request), _): WithRejection<Json<ChangePasswordRequest>, BackendError>,
) -> BackendResult<ApiResponse<()>> {
    store_password(
        &state.db_pool,
        user.user_id,
        &request.old_password,
        &request.new_password,
        state.config.bcrypt_cost,
    )
    .await?;
    Ok(ApiResponse::message_only("Password changed successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::marker::PhantomData;
    use crate::backend::auth::users::authenticate;
    use crate::backend::test_support::{auth_user, create_user, test_state};
    use assert_matches::assert_matches;

    fn body(old: &str, new: &str) -> WithRejection<Json<ChangePasswordRequest>, BackendError> {
        let request = ChangePasswordRequest {
            old_password: old.to_string(),
            new_password: new.to_string(),
        };
        WithRejection(Json(request), PhantomData)
    }

    #[tokio::test]
    async fn test_get_me() {
        let (state, _dir) = test_state().await;
        let user = create_user(&state.db_pool, "ana").await;

        let response = get_me(State(state), auth_user(&user)).await.unwrap();
        let profile = response.data.unwrap();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_change_password() {
        let (state, _dir) = test_state().await;
        let user = create_user(&state.db_pool, "ana").await;

        let wrong_old = body("wrong1", "newpass");
        assert_matches!(
            change_password(State(state.clone()), auth_user(&user), wrong_old).await,
            Err(BackendError::Unauthorized { .. })
        );
        assert_matches!(
            change_password(State(state.clone()), auth_user(&user), body("secret1", "abc")).await,
            Err(BackendError::SharedError(_))
        );

        change_password(State(state.clone()), auth_user(&user), body("secret1", "newpass"))
            .await
            .unwrap();
        assert!(authenticate(&state.db_pool, Some("ana"), None, "newpass").await.is_ok());
        assert!(authenticate(&state.db_pool, Some("ana"), None, "secret1").await.is_err());
    }
}
