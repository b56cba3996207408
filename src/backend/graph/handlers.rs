/**
 * Social Graph Handlers
 *
 * - GET  /api/v1/users/profile/{username}
 * - POST /api/v1/users/follow-unfollow/{id}
 * - GET  /api/v1/users/get-suggested-users
 * - POST /api/v1/users/update-user (JSON or multipart with images)
 *
 * All of them require authentication.
 */

use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::backend::auth::users::{
    get_user_by_id, load_profile, profile_by_username, update_user as store_update, ProfileChanges,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::graph::db::{follow_toggle, suggest_users, DEFAULT_SUGGESTIONS};
use crate::backend::media::Submission;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{ApiResponse, FollowOutcome, UpdateUserRequest, UserProfile, UserSummary};

/// Public profile by username (case-insensitive)
pub async fn get_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Path(username), _): WithRejection<Path<String>, BackendError>,
) -> BackendResult<ApiResponse<UserProfile>> {
    let profile = profile_by_username(&state.db_pool, &username).await?;
    Ok(ApiResponse::ok(profile, "User profile fetched successfully"))
}

/// Toggle whether the caller follows user `id`
///
/// # Errors
///
/// * `400 Bad Request` - `id` is the caller
/// * `404 Not Found` - no such user
pub async fn follow_unfollow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    WithRejection(Path(target_id), _): WithRejection<Path<Uuid>, BackendError>,
) -> BackendResult<ApiResponse<FollowOutcome>> {
    let outcome = follow_toggle(&state.db_pool, user.user_id, target_id).await?;
    Ok(ApiResponse::ok(outcome, outcome.message()))
}

/// Up to ten users the caller does not follow yet
pub async fn suggested_users(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<ApiResponse<Vec<UserSummary>>> {
    let users = suggest_users(&state.db_pool, user.user_id, DEFAULT_SUGGESTIONS).await?;
    Ok(ApiResponse::ok(users, "Suggested users fetched successfully"))
}

/// Update the caller's profile
///
/// Multipart requests may replace `profileImg` and `coverImg`. Images that
/// get replaced are removed from the upload directory after the update
/// commits.
///
/// # Errors
///
/// * `400 Bad Request` - malformed email, non-image upload
/// * `409 Conflict` - email or username taken by another account
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    submission: Submission<UpdateUserRequest>,
) -> BackendResult<ApiResponse<UserProfile>> {
    let changes = match submission {
        Submission::Json(body) => ProfileChanges {
            full_name: body.full_name,
            email: body.email,
            username: body.username,
            bio: body.bio,
            link: body.link,
            ..ProfileChanges::default()
        },
        Submission::Form(mut form) => {
            let profile_img = state.media.save_optional(form.take_file("profileImg")).await?;
            let cover_img = match state.media.save_optional(form.take_file("coverImg")).await {
                Ok(url) => url,
                Err(e) => {
                    if let Some(url) = &profile_img {
                        state.media.discard(url).await;
                    }
                    return Err(e);
                }
            };
            ProfileChanges {
                full_name: form.text("fullName"),
                email: form.text("email"),
                username: form.text("username"),
                bio: form.text("bio"),
                link: form.text("link"),
                profile_img,
                cover_img,
            }
        }
    };

    let new_images: Vec<String> = changes
        .profile_img
        .iter()
        .chain(changes.cover_img.iter())
        .cloned()
        .collect();
    let before = get_user_by_id(&state.db_pool, auth.user_id).await?;

    let user = match store_update(&state.db_pool, auth.user_id, changes).await {
        Ok(user) => user,
        Err(e) => {
            for url in &new_images {
                state.media.discard(url).await;
            }
            return Err(e);
        }
    };

    if let Some(before) = before {
        for (old, new) in [
            (&before.profile_img, &user.profile_img),
            (&before.cover_img, &user.cover_img),
        ] {
            if !old.is_empty() && old != new {
                state.media.discard(old).await;
            }
        }
    }

    let profile = load_profile(&state.db_pool, &user).await?;
    Ok(ApiResponse::ok(profile, "User updated successfully"))
}
