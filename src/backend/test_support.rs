//! Fixtures for the store-level and handler unit tests.

use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::backend::auth::sessions::TokenService;
use crate::backend::auth::users::{register_user, NewUser, User};
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::server::config::{connect_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Cheapest bcrypt cost, keeps hashing out of test time
pub const TEST_COST: u32 = 4;

/// Fresh, migrated in-memory database
pub async fn test_pool() -> SqlitePool {
    connect_database("sqlite::memory:")
        .await
        .expect("in-memory database")
}

pub fn test_tokens() -> TokenService {
    TokenService::new("test-access-secret", 900, "test-refresh-secret", 3600)
}

/// Registration input for `name` with password `secret1`
pub fn new_user(name: &str) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
        password: "secret1".to_string(),
        ..Default::default()
    }
}

pub async fn create_user(pool: &SqlitePool, name: &str) -> User {
    register_user(pool, new_user(name), TEST_COST)
        .await
        .expect("register test user")
}

/// Application state over a fresh database, uploads going to a temp dir
///
/// Keep the returned directory alive for as long as the state is used.
pub async fn test_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("temp upload dir");
    let config = ServerConfig {
        upload_dir: dir.path().to_path_buf(),
        bcrypt_cost: TEST_COST,
        access_token_secret: "test-access-secret".to_string(),
        refresh_token_secret: "test-refresh-secret".to_string(),
        ..ServerConfig::default()
    };
    (AppState::new(test_pool().await, config), dir)
}

/// The extractor value the auth middleware would produce for `user`
pub fn auth_user(user: &User) -> AuthUser {
    AuthUser(AuthenticatedUser {
        user_id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    })
}
