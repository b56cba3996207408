/**
 * Error Details Middleware
 *
 * In development the failure envelope also carries `stack`, the debug
 * rendering of the error. Every `BackendError` response holds that fuller
 * envelope as an [`ErrorDetails`] extension; this layer sends it in place of
 * the regular body when the application runs in development, and leaves the
 * response alone otherwise.
 */

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::ErrorDetails;
use crate::backend::server::state::AppState;

pub async fn error_details_middleware(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !app_state.config.is_development() {
        return response;
    }

    match response.extensions().get::<ErrorDetails>().cloned() {
        Some(ErrorDetails(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::backend::routes::router::create_router;
    use crate::backend::server::config::{Environment, ServerConfig};
    use crate::backend::test_support::test_state;

    async fn unknown_route(environment: Environment) -> serde_json::Value {
        let (mut state, _dir) = test_state().await;
        state.config = Arc::new(ServerConfig {
            environment,
            ..(*state.config).clone()
        });

        let response = create_router(state)
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_stack_only_in_development() {
        let body = unknown_route(Environment::Development).await;
        assert_eq!(body["message"], "Route not found");
        assert!(body["stack"].as_str().unwrap().contains("NotFound"));

        let body = unknown_route(Environment::Production).await;
        assert_eq!(body["message"], "Route not found");
        assert!(body.get("stack").is_none());
    }
}
