//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Main router creation and shared layers
//! - **`api_routes`** - `/api/v1` endpoints, split into public and
//!   authenticated groups
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports and documentation
//! ├── router.rs      - Main router creation
//! └── api_routes.rs  - API endpoint table
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use chirp::backend::routes::create_router;
//! use chirp::backend::server::{config::connect_database, AppState, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect_database("sqlite::memory:").await?;
//! let router = create_router(AppState::new(pool, ServerConfig::default()));
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint table
pub mod api_routes;

pub use router::create_router;
