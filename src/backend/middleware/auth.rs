/**
 * Authentication Middleware
 *
 * Protects routes that require a signed-in user. The access token is read
 * from the `Authorization: Bearer <token>` header or, failing that, from the
 * `accessToken` cookie. A valid token whose user no longer exists is
 * rejected like an invalid one.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::backend::auth::sessions::subject_user_id;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Cookie carrying the access token
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Authenticated user data attached to the request
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// 1. Extracts the access token (header first, then cookie)
/// 2. Verifies it against the access secret
/// 3. Checks the user still exists
/// 4. Attaches [`AuthenticatedUser`] to the request extensions
///
/// Fails with 401 in the error envelope otherwise.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers())
        .or_else(|| cookie_token(request.headers()))
        .ok_or_else(|| BackendError::unauthorized("Unauthorized request"))?;

    let claims = app_state.tokens.verify_access_token(&token).map_err(|e| {
        tracing::warn!("Invalid access token: {}", e);
        BackendError::unauthorized("Invalid access token")
    })?;
    let user_id = subject_user_id(&claims.sub)?;

    let user = get_user_by_id(&app_state.db_pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {}", user_id);
            BackendError::unauthorized("Invalid access token")
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        email: user.email,
    });

    Ok(next.run(request).await)
}

/// Extractor for the user attached by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Unauthorized request")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_cookie_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; accessToken=tok123"),
        );
        assert_eq!(cookie_token(&headers).as_deref(), Some("tok123"));
        assert_eq!(bearer_token(&headers), None);
    }
}
