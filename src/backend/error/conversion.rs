/**
 * Response Conversion
 *
 * `IntoResponse` implementations for the two envelope shapes:
 *
 * - `BackendError` becomes `{success: false, statusCode, message, errors, stack?}`
 * - `ApiResponse<T>` becomes `{success: true, statusCode, message, data}`
 *
 * Both are sent with the status code they carry. Errors are logged here, once,
 * at the boundary: server errors at `error`, client errors at `warn`.
 *
 * The body never includes `stack`. The envelope with `stack` filled in rides
 * along as an [`ErrorDetails`] response extension, and the router's
 * `error_details_middleware` sends that one instead in development.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::backend::error::types::BackendError;
use crate::shared::{ApiErrorBody, ApiResponse};

/// Failure envelope of a response, with its `stack` filled in
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub ApiErrorBody);

impl BackendError {
    /// Build the failure envelope for this error, without `stack`
    pub fn to_body(&self) -> ApiErrorBody {
        ApiErrorBody {
            success: false,
            status_code: self.status_code().as_u16(),
            message: self.message(),
            errors: self.details(),
            stack: None,
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = self.to_body();
        let details = ErrorDetails(ApiErrorBody {
            stack: Some(format!("{:?}", self)),
            ..body.clone()
        });

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(details);
        response
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
