/**
 * Sessions and JWT Tokens
 *
 * Two kinds of HS256 token, each with its own secret and lifetime:
 *
 * - **access** tokens authenticate individual requests and are verified
 *   statelessly;
 * - **refresh** tokens are only good for minting a new pair, and only while
 *   they match the user's session record.
 *
 * The session record (`sessions` table) holds one live refresh token per
 * user together with a rotation counter. Issuing a session replaces the
 * token and bumps the counter, so a refresh token that has been rotated away,
 * or whose session was ended by logout, is rejected even though its signature
 * and expiry are still valid. Access tokens already handed out stay valid
 * until they expire.
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::config::{begin_write, ServerConfig};
use crate::shared::TokenPair;

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Refresh token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID
    pub sub: String,
    /// Session rotation this token was issued for
    pub rot: i64,
    /// Unique token id
    pub jti: String,
    pub exp: u64,
    pub iat: u64,
}

/// Signs and verifies access and refresh tokens
#[derive(Clone)]
pub struct TokenService {
    access_secret: String,
    access_ttl: i64,
    refresh_secret: String,
    refresh_ttl: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Lifetimes are in seconds
    pub fn new(
        access_secret: impl Into<String>,
        access_ttl: i64,
        refresh_secret: impl Into<String>,
        refresh_ttl: i64,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            access_ttl,
            refresh_secret: refresh_secret.into(),
            refresh_ttl,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.access_token_secret.clone(),
            config.access_token_ttl,
            config.refresh_token_secret.clone(),
            config.refresh_token_ttl,
        )
    }

    pub fn create_access_token(&self, user: &User) -> BackendResult<String> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            exp: unix(now + self.access_ttl),
            iat: unix(now),
        };
        let key = EncodingKey::from_secret(self.access_secret.as_bytes());
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &key)?)
    }

    /// Returns the token and the moment it expires
    pub fn create_refresh_token(
        &self,
        user_id: Uuid,
        rotation: i64,
    ) -> BackendResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.refresh_ttl);
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            rot: rotation,
            jti: Uuid::new_v4().to_string(),
            exp: unix(expires_at.timestamp()),
            iat: unix(now.timestamp()),
        };
        let key = EncodingKey::from_secret(self.refresh_secret.as_bytes());
        Ok((encode(&Header::new(Algorithm::HS256), &claims, &key)?, expires_at))
    }

    pub fn verify_access_token(&self, token: &str) -> BackendResult<AccessClaims> {
        let key = DecodingKey::from_secret(self.access_secret.as_bytes());
        let data = decode::<AccessClaims>(token, &key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }

    pub fn verify_refresh_token(&self, token: &str) -> BackendResult<RefreshClaims> {
        let key = DecodingKey::from_secret(self.refresh_secret.as_bytes());
        let data = decode::<RefreshClaims>(token, &key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

fn unix(timestamp: i64) -> u64 {
    u64::try_from(timestamp).unwrap_or(0)
}

/// Parse the user id out of a token subject
pub fn subject_user_id(sub: &str) -> BackendResult<Uuid> {
    Uuid::parse_str(sub).map_err(|_| BackendError::unauthorized("Invalid token subject"))
}

/// Start (or restart) the session of `user`
///
/// Replaces any previous refresh token of the user.
pub async fn issue_session(
    pool: &SqlitePool,
    tokens: &TokenService,
    user: &User,
) -> BackendResult<TokenPair> {
    let mut tx = begin_write(pool).await?;

    let current: Option<i64> = sqlx::query_scalar("SELECT rotation FROM sessions WHERE user_id = ?")
        .bind(user.id)
        .fetch_optional(&mut *tx)
        .await?;
    let rotation = current.unwrap_or(0) + 1;

    let access_token = tokens.create_access_token(user)?;
    let (refresh_token, expires_at) = tokens.create_refresh_token(user.id, rotation)?;

    sqlx::query(
        "INSERT INTO sessions (user_id, refresh_token, rotation, expires_at, updated_at) \
         VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(user_id) DO UPDATE SET refresh_token = excluded.refresh_token, \
         rotation = excluded.rotation, expires_at = excluded.expires_at, \
         updated_at = excluded.updated_at",
    )
    .bind(user.id)
    .bind(&refresh_token)
    .bind(rotation)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Issued session rotation {} for user {}", rotation, user.id);
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Exchange a refresh token for a fresh pair
///
/// The token must verify against the refresh secret and be the one currently
/// stored for its user; any other token (rotated, logged out, forged, expired)
/// fails with `Unauthorized`. The stored token is swapped for the new one in a
/// single conditional update, so a token can be redeemed at most once even by
/// concurrent requests.
pub async fn refresh_session(
    pool: &SqlitePool,
    tokens: &TokenService,
    refresh_token: &str,
) -> BackendResult<(User, TokenPair)> {
    let claims = tokens
        .verify_refresh_token(refresh_token)
        .map_err(|_| BackendError::unauthorized("Invalid refresh token"))?;
    let user_id = subject_user_id(&claims.sub)?;

    let user = get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| BackendError::unauthorized("Invalid refresh token"))?;

    let rotation = claims.rot + 1;
    let access_token = tokens.create_access_token(&user)?;
    let (next_refresh_token, expires_at) = tokens.create_refresh_token(user.id, rotation)?;

    let swapped = sqlx::query(
        "UPDATE sessions SET refresh_token = ?, rotation = ?, expires_at = ?, updated_at = ? \
         WHERE user_id = ? AND refresh_token = ?",
    )
    .bind(&next_refresh_token)
    .bind(rotation)
    .bind(expires_at)
    .bind(Utc::now())
    .bind(user_id)
    .bind(refresh_token)
    .execute(pool)
    .await?
    .rows_affected();

    if swapped == 0 {
        tracing::warn!("Rejected stale refresh token for user {}", user_id);
        return Err(BackendError::unauthorized("Refresh token is expired or used"));
    }

    tracing::debug!("Rotated session to {} for user {}", rotation, user.id);
    let pair = TokenPair {
        access_token,
        refresh_token: next_refresh_token,
    };
    Ok((user, pair))
}

/// Forget the session of `user_id`; its refresh token stops working
pub async fn end_session(pool: &SqlitePool, user_id: Uuid) -> BackendResult<()> {
    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    tracing::debug!("Ended session for user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{create_user, test_pool, test_tokens};
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_access_token_round_trip() {
        let pool = test_pool().await;
        let user = create_user(&pool, "ana").await;
        let tokens = test_tokens();

        let token = tokens.create_access_token(&user).unwrap();
        let claims = tokens.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "ana");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_access_and_refresh_secrets_are_not_interchangeable() {
        let tokens = test_tokens();
        let (refresh, _) = tokens.create_refresh_token(Uuid::new_v4(), 1).unwrap();

        assert!(tokens.verify_access_token(&refresh).is_err());
        assert!(tokens.verify_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new("a", -300, "r", -300);
        let (refresh, _) = tokens.create_refresh_token(Uuid::new_v4(), 1).unwrap();
        assert!(tokens.verify_refresh_token(&refresh).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        assert!(test_tokens().verify_access_token("invalid.token.here").is_err());
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_rejects_previous_token() {
        let pool = test_pool().await;
        let user = create_user(&pool, "ana").await;
        let tokens = test_tokens();

        let first = issue_session(&pool, &tokens, &user).await.unwrap();
        let (refreshed_user, second) = refresh_session(&pool, &tokens, &first.refresh_token)
            .await
            .unwrap();

        assert_eq!(refreshed_user.id, user.id);
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_matches!(
            refresh_session(&pool, &tokens, &first.refresh_token).await,
            Err(BackendError::Unauthorized { .. })
        );
        assert!(refresh_session(&pool, &tokens, &second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_refresh_redeems_token_once() {
        let pool = test_pool().await;
        let user = create_user(&pool, "ana").await;
        let tokens = test_tokens();
        let pair = issue_session(&pool, &tokens, &user).await.unwrap();

        let (first, second) = tokio::join!(
            refresh_session(&pool, &tokens, &pair.refresh_token),
            refresh_session(&pool, &tokens, &pair.refresh_token),
        );

        let winners: Vec<TokenPair> = [first, second]
            .into_iter()
            .filter_map(Result::ok)
            .map(|(_, pair)| pair)
            .collect();
        assert_eq!(winners.len(), 1);
        assert!(refresh_session(&pool, &tokens, &winners[0].refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_new_login_invalidates_previous_refresh_token() {
        let pool = test_pool().await;
        let user = create_user(&pool, "ana").await;
        let tokens = test_tokens();

        let first = issue_session(&pool, &tokens, &user).await.unwrap();
        let second = issue_session(&pool, &tokens, &user).await.unwrap();

        assert!(refresh_session(&pool, &tokens, &first.refresh_token).await.is_err());
        assert!(refresh_session(&pool, &tokens, &second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_end_session_revokes_refresh_but_not_access() {
        let pool = test_pool().await;
        let user = create_user(&pool, "ana").await;
        let tokens = test_tokens();

        let pair = issue_session(&pool, &tokens, &user).await.unwrap();
        end_session(&pool, user.id).await.unwrap();

        assert_matches!(
            refresh_session(&pool, &tokens, &pair.refresh_token).await,
            Err(BackendError::Unauthorized { .. })
        );
        assert!(tokens.verify_access_token(&pair.access_token).is_ok());
    }
}
