//! Envelope assertions

use axum::http::StatusCode;

use super::server::TestResponse;

/// Assert a failure envelope with the given status
#[track_caller]
pub fn assert_failure(response: &TestResponse, status: StatusCode) {
    assert_eq!(response.status, status, "unexpected body: {:?}", response.body);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["statusCode"], status.as_u16());
    assert!(response.body["message"].is_string());
    assert!(response.body["errors"].is_array());
}

/// Assert a success envelope with the given status
#[track_caller]
pub fn assert_success(response: &TestResponse, status: StatusCode) {
    assert_eq!(response.status, status, "unexpected body: {:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["statusCode"], status.as_u16());
}
