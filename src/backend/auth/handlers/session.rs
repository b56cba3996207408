/**
 * Session Handlers
 *
 * - POST /api/v1/users/refresh-token - trade a refresh token for a new pair
 * - POST /api/v1/users/logout - end the session and clear the cookies
 *
 * The refresh token is read from the `refreshToken` cookie, falling back to
 * a `refreshToken` field in the JSON body for non-browser clients.
 */

use axum::body::Bytes;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::handlers::cookies::{with_session_cookies, without_session_cookies};
use crate::backend::auth::sessions::{end_session, refresh_session};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, REFRESH_COOKIE};
use crate::backend::server::state::AppState;
use crate::shared::validation::non_blank;
use crate::shared::{ApiResponse, RefreshRequest, TokenPair};

fn body_token(body: &[u8]) -> BackendResult<Option<String>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let request: RefreshRequest = serde_json::from_slice(body)?;
    Ok(non_blank(request.refresh_token.as_deref()))
}

/// Refresh handler
///
/// # Errors
///
/// * `401 Unauthorized` - no token supplied, or the token is invalid,
///   expired, rotated away or logged out
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> BackendResult<(CookieJar, ApiResponse<TokenPair>)> {
    let token = match jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()) {
        Some(token) if !token.is_empty() => token,
        _ => body_token(&body)?.ok_or_else(|| BackendError::unauthorized("Unauthorized request"))?,
    };

    let (user, pair) = refresh_session(&state.db_pool, &state.tokens, &token).await?;
    tracing::debug!("Refreshed session for user {}", user.id);

    let jar = with_session_cookies(jar, &pair, !state.config.is_development());
    Ok((jar, ApiResponse::ok(pair, "Access token refreshed")))
}

/// Logout handler
///
/// Stops the current refresh token from working. Access tokens already
/// issued stay valid until they expire.
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
) -> BackendResult<(CookieJar, ApiResponse<()>)> {
    end_session(&state.db_pool, user.user_id).await?;
    tracing::info!("User logged out: {}", user.username);
    Ok((without_session_cookies(jar), ApiResponse::message_only("User logged out")))
}
