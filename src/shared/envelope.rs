//! Response Envelope
//!
//! Every API response body is wrapped in one of two shapes:
//!
//! ```json
//! { "success": true,  "statusCode": 200, "message": "...", "data": { } }
//! { "success": false, "statusCode": 404, "message": "...", "errors": [] }
//! ```
//!
//! The failure shape may additionally carry a `stack` string when the server
//! runs in development mode.

use serde::{Deserialize, Serialize};

/// Successful response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Always `true` for this shape
    pub success: bool,
    /// HTTP status the response is sent with
    pub status_code: u16,
    /// Human-readable summary
    pub message: String,
    /// Payload, `null` for operations that return nothing
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Envelope with an explicit status code
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            success: status_code < 400,
            status_code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 200 envelope
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(200, data, message)
    }

    /// 201 envelope
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(201, data, message)
    }
}

impl ApiResponse<()> {
    /// 200 envelope with `data: null`
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            status_code: 200,
            message: message.into(),
            data: None,
        }
    }
}

/// Failure envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Always `false` for this shape
    pub success: bool,
    /// HTTP status the response is sent with
    pub status_code: u16,
    /// Human-readable error message
    pub message: String,
    /// Field-level details, empty when there are none
    #[serde(default)]
    pub errors: Vec<String>,
    /// Debug rendering of the error, development mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}
