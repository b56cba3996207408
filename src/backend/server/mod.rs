//! Server Module
//!
//! Configuration, shared state and application assembly.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Environment configuration, database connection
//! └── init.rs         - Application assembly
//! ```
//!
//! # Example
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

/// Application state
pub mod state;

/// Configuration loading
pub mod config;

/// Application assembly
pub mod init;

pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
