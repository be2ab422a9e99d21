// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use herald_core::HeraldError;
use serde::Serialize;
use tracing::error;

/// Message returned for any server-side failure before streaming starts.
pub const PROCESSING_FAILED: &str = "Failed to process request";

/// An HTTP error rendered as `{error, message, code}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    code: u16,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.status.canonical_reason().unwrap_or("Error"),
            message: &self.message,
            code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Caller mistakes keep their message. Everything else is logged and
/// reported generically.
impl From<HeraldError> for ApiError {
    fn from(err: HeraldError) -> Self {
        match err {
            HeraldError::Validation(message) => Self::bad_request(message),
            other => {
                error!(error = %other, "request failed before streaming");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::from(HeraldError::Validation("No user message found".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "No user message found");
    }

    #[test]
    fn provider_failure_is_generic_500() {
        let err = ApiError::from(HeraldError::Provider {
            message: "API key not valid".into(),
            source: None,
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), PROCESSING_FAILED);
    }

    #[test]
    fn response_carries_status_and_code() {
        let response = ApiError::bad_request("Invalid JSON").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }
}
