/**
 * Register Handler
 *
 * POST /api/v1/users/register
 *
 * Accepts either a JSON body or a multipart form. The multipart form may
 * carry `profileImg` and `coverImg` image files next to the text fields;
 * they are stored before the account is created and released again if
 * registration fails.
 *
 * The response is the new user's public profile. No session is started;
 * the client logs in separately.
 */

use axum::extract::State;

use crate::backend::auth::users::{load_profile, register_user, NewUser};
use crate::backend::error::BackendResult;
use crate::backend::media::{MediaStore, Submission};
use crate::backend::server::state::AppState;
use crate::shared::{ApiResponse, RegisterRequest, UserProfile};

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - missing field, malformed email, short password,
///   non-image upload
/// * `409 Conflict` - username or email already taken
///
/// # Example Request
///
/// ```http
/// POST /api/v1/users/register HTTP/1.1
/// Content-Type: application/json
///
/// { "username": "ana", "email": "ana@example.com", "password": "secret1", "fullName": "Ana Lima" }
/// ```
pub async fn register(
    State(state): State<AppState>,
    submission: Submission<RegisterRequest>,
) -> BackendResult<ApiResponse<UserProfile>> {
    let new_user = match submission {
        Submission::Json(body) => NewUser {
            username: body.username,
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            ..NewUser::default()
        },
        Submission::Form(mut form) => {
            let profile_img = state.media.save_optional(form.take_file("profileImg")).await?;
            let cover_img = match state.media.save_optional(form.take_file("coverImg")).await {
                Ok(url) => url,
                Err(e) => {
                    release(&state.media, profile_img.as_deref()).await;
                    return Err(e);
                }
            };
            NewUser {
                username: form.text("username").unwrap_or_default(),
                email: form.text("email").unwrap_or_default(),
                password: form.text("password").unwrap_or_default(),
                full_name: form.text("fullName"),
                profile_img,
                cover_img,
            }
        }
    };

    let profile_img = new_user.profile_img.clone();
    let cover_img = new_user.cover_img.clone();

    let user = match register_user(&state.db_pool, new_user, state.config.bcrypt_cost).await {
        Ok(user) => user,
        Err(e) => {
            release(&state.media, profile_img.as_deref()).await;
            release(&state.media, cover_img.as_deref()).await;
            return Err(e);
        }
    };

    let profile = load_profile(&state.db_pool, &user).await?;
    Ok(ApiResponse::created(profile, "User registered Successfully"))
}

async fn release(media: &MediaStore, url: Option<&str>) {
    if let Some(url) = url {
        media.discard(url).await;
    }
}
