/**
 * Router Configuration
 *
 * Combines the API routes, the upload directory and the shared layers into
 * the application router.
 *
 * # Layout
 *
 * 1. `/api/v1/...` - JSON API (see `api_routes`)
 * 2. `/uploads/...` - stored images
 * 3. Fallback - 404 in the error envelope
 *
 * Every request passes through a `TraceLayer` and the development-only
 * error details layer.
 */

use axum::{middleware, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::media::store::PUBLIC_PREFIX;
use crate::backend::middleware::error_details_middleware;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

async fn route_not_found() -> BackendError {
    BackendError::not_found("Route not found")
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let uploads = ServeDir::new(app_state.media.root());

    Router::new()
        .nest("/api/v1", configure_api_routes(app_state.clone()))
        .nest_service(PUBLIC_PREFIX, uploads)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            error_details_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
