//! Posts Module
//!
//! Posts, comments and likes, the feeds built from them, and their HTTP
//! handlers.
//!
//! # Module Structure
//!
//! ```text
//! posts/
//! ├── mod.rs       - Module exports
//! ├── db.rs        - Content store (create/delete, comments, like toggle)
//! ├── feed.rs      - Feed composition and post hydration
//! └── handlers.rs  - HTTP handlers for /api/v1/posts
//! ```

/// Content store
pub mod db;

/// Feed composition
pub mod feed;

/// HTTP handlers
pub mod handlers;

pub use feed::{compose_feed, FeedMode};
