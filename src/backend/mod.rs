//! Backend Module
//!
//! All server-side code: an Axum HTTP API over SQLite for accounts, follows,
//! posts, comments, likes and notifications.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, assembly
//! - **`routes`** - Route table and router layers
//! - **`auth`** - Identity store, token service, account handlers
//! - **`graph`** - Follow relationships, suggestions, profiles
//! - **`posts`** - Content store, feed composer, post handlers
//! - **`notifications`** - Like and follow notifications
//! - **`media`** - Image uploads
//! - **`middleware`** - Access-token authentication
//! - **`error`** - `BackendError` and the error envelope
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Configuration and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Accounts and sessions
//! ├── graph/          - Follow graph
//! ├── posts/          - Posts and feeds
//! ├── notifications/  - Notifications
//! ├── media/          - Uploads
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Concurrency
//!
//! Handlers share one `SqlitePool`. Writes that touch more than one row
//! (follow and like toggles with their notification, post deletion, session
//! rotation, marking notifications read) run inside a single transaction.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Accounts and sessions
pub mod auth;

/// Follow graph
pub mod graph;

/// Posts, comments, likes and feeds
pub mod posts;

/// Notifications
pub mod notifications;

/// Image uploads
pub mod media;

/// Middleware for request processing
pub mod middleware;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{BackendError, BackendResult};
pub use server::create_app;
