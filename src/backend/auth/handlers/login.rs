/**
 * Login Handler
 *
 * POST /api/v1/users/login
 *
 * # Authentication Process
 *
 * 1. Look up the user by username or email
 * 2. Verify the password using bcrypt
 * 3. Start a new session (replacing any previous refresh token)
 * 4. Return the profile and both tokens, and set them as cookies
 */

use axum::extract::State;
use axum::Json;
use axum_extra::extract::{cookie::CookieJar, WithRejection};

use crate::backend::auth::handlers::cookies::with_session_cookies;
use crate::backend::auth::sessions::issue_session;
use crate::backend::auth::users::{authenticate, load_profile};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::{ApiResponse, AuthPayload, LoginRequest};

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - neither username nor email given
/// * `404 Not Found` - no such user
/// * `401 Unauthorized` - wrong password
///
/// # Example Request
///
/// ```http
/// POST /api/v1/users/login HTTP/1.1
/// Content-Type: application/json
///
/// { "email": "ana@example.com", "password": "secret1" }
/// ```
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, BackendError>,
) -> BackendResult<(CookieJar, ApiResponse<AuthPayload>)> {
    let user = authenticate(
        &state.db_pool,
        request.username.as_deref(),
        request.email.as_deref(),
        &request.password,
    )
    .await?;

    let pair = issue_session(&state.db_pool, &state.tokens, &user).await?;
    let profile = load_profile(&state.db_pool, &user).await?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.id);

    let jar = with_session_cookies(jar, &pair, !state.config.is_development());
    Ok((
        jar,
        ApiResponse::ok(
            AuthPayload {
                user: profile,
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}
