//! Authentication Handlers Module
//!
//! HTTP handlers for account and session endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports
//! ├── cookies.rs   - accessToken / refreshToken cookie helpers
//! ├── register.rs  - Account registration (JSON or multipart)
//! ├── login.rs     - Credential check and session start
//! ├── session.rs   - Refresh token rotation and logout
//! └── me.rs        - Current user and password change
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/v1/users/register
//! - **`login`** - POST /api/v1/users/login
//! - **`refresh_token`** - POST /api/v1/users/refresh-token
//! - **`logout`** - POST /api/v1/users/logout (authenticated)
//! - **`get_me`** - GET /api/v1/users/me (authenticated)
//! - **`change_password`** - POST /api/v1/users/change-password (authenticated)

/// Session cookie helpers
pub mod cookies;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Refresh and logout handlers
pub mod session;

/// Current user handlers
pub mod me;

pub use login::login;
pub use me::{change_password, get_me};
pub use register::register;
pub use session::{logout, refresh_token};
