/**
 * Server Initialization
 *
 * Builds the application from a configuration:
 *
 * 1. Open the database and apply migrations
 * 2. Make sure the upload directory exists
 * 3. Assemble `AppState`
 * 4. Build the router
 *
 * A database that cannot be opened is fatal; the server has nothing to serve
 * without it.
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing chirp backend");

    let db_pool = load_database(&config).await?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!("Serving uploads from {}", config.upload_dir.display());

    if config.is_development() {
        tracing::warn!("Development mode: error responses include debug details");
    }

    let app_state = AppState::new(db_pool, config);
    Ok(create_router(app_state))
}
