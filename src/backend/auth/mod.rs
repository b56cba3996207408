//! Authentication Module
//!
//! Accounts, credentials and sessions.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports and documentation
//! ├── users.rs     - Identity store: accounts, profiles, passwords
//! ├── sessions.rs  - Token service and session records
//! └── handlers/    - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email and password → account created → profile returned
//! 2. **Login**: username or email plus password → session started → access and refresh tokens
//! 3. **Refresh**: live refresh token → new pair, the old refresh token stops working
//! 4. **Logout**: session record deleted → refresh token stops working
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt and never leave this module
//! - Access tokens are short-lived and verified statelessly
//! - Refresh tokens are checked against the stored session, so each works once

/// Identity store
pub mod users;

/// Token service and session records
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{change_password, get_me, login, logout, refresh_token, register};
pub use sessions::TokenService;
