//! Input validation rules shared by registration, profile updates and posting.

use std::sync::OnceLock;

use regex::Regex;

use crate::shared::error::SharedError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Trim `value` and reject it if nothing is left
pub fn require_non_blank(field: &str, value: &str) -> Result<String, SharedError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value, or `None` when the input is absent or blank
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate_email(email: &str) -> Result<String, SharedError> {
    let email = require_non_blank("email", email)?;
    if !is_valid_email(&email) {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.trim().is_empty() {
        return Err(SharedError::validation("password", "password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters long", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Usernames are stored lower-cased
pub fn normalize_username(username: &str) -> Result<String, SharedError> {
    Ok(require_non_blank("username", username)?.to_lowercase())
}
