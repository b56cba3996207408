//! Notifications Module
//!
//! Storage and HTTP handlers for like and follow notifications.

/// Notification store
pub mod db;

/// HTTP handlers
pub mod handlers;
