//! Social Graph Module
//!
//! Follow relationships, user suggestions, and the profile endpoints built on
//! top of them.
//!
//! # Module Structure
//!
//! ```text
//! graph/
//! ├── mod.rs       - Module exports
//! ├── db.rs        - Follow toggle and suggestions
//! └── handlers.rs  - Profile, follow, suggestion and update-user handlers
//! ```

/// Follow graph database operations
pub mod db;

/// HTTP handlers
pub mod handlers;
