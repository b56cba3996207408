//! Common test utilities and helpers
//!
//! - `server` - in-process application and request helpers
//! - `assertions` - envelope assertions

#![allow(dead_code)]

pub mod assertions;
pub mod server;

pub use assertions::*;
pub use server::*;
