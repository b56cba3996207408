//! Middleware Module
//!
//! Request processing that wraps handlers.
//!
//! - **`auth`** - access-token authentication for protected routes
//! - **`error_details`** - debug details in error responses, development only
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use chirp::backend::middleware::auth_middleware;
//! use chirp::backend::server::AppState;
//!
//! fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;
pub mod error_details;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser, ACCESS_COOKIE, REFRESH_COOKIE};
pub use error_details::error_details_middleware;
