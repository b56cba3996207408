/**
 * Application State Management
 *
 * This module defines the application state and the `FromRef`
 * implementations that let handlers extract only the part they need.
 *
 * # Contents
 *
 * - the SQLite connection pool
 * - the token service (access/refresh signing keys and lifetimes)
 * - the media store (upload directory)
 * - the loaded configuration
 *
 * Everything is cheap to clone: the pool and configuration are reference
 * counted, the token service and media store are small value types.
 *
 * # Example
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use sqlx::SqlitePool;
 *
 * async fn handler(State(pool): State<SqlitePool>) {
 *     // query with the pool
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::sessions::TokenService;
use crate::backend::media::MediaStore;
use crate::backend::server::config::ServerConfig;

/// Central state container shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db_pool: SqlitePool,
    /// Token signing and verification
    pub tokens: TokenService,
    /// Uploaded image storage
    pub media: MediaStore,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: ServerConfig) -> Self {
        Self {
            db_pool,
            tokens: TokenService::from_config(&config),
            media: MediaStore::new(config.upload_dir.clone()),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for MediaStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.media.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
