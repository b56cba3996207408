//! Chirp - Main Library
//!
//! Chirp is the backend of a small social network: users register and sign
//! in, follow each other, publish short posts with an optional image, comment
//! on and like posts, and get notified when someone follows them or likes
//! their post.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared with API clients
//!   - Request bodies and response shapes
//!   - The `{success, statusCode, message, data}` envelope
//!   - Input validation rules
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP API under `/api/v1`
//!   - SQLite persistence through sqlx
//!   - JWT access and refresh tokens, bcrypt password hashing
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - the server; without it only `shared` is built,
//!   which is enough for a client of the API.
//!
//! # Usage
//!
//! ```rust,no_run
//! use chirp::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
