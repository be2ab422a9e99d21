// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response hardening headers and the CORS policy.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use herald_core::HeraldError;
use tower_http::cors::CorsLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const CORS_MAX_AGE: Duration = Duration::from_secs(300);

/// Precomputed header values shared by every response.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    csp: HeaderValue,
}

impl SecurityHeaders {
    /// The content security policy allows `allowed_origin` as a fetch target.
    pub fn new(allowed_origin: &str) -> Result<Self, HeraldError> {
        let csp = format!(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data: https:; \
             connect-src 'self' {allowed_origin}; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'"
        );
        let csp = HeaderValue::from_str(&csp)
            .map_err(|e| HeraldError::Config(format!("invalid allowed_origin for CSP: {e}")))?;
        Ok(Self { csp })
    }
}

pub async fn security_headers(
    State(policy): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_SECURITY_POLICY, policy.csp.clone());
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
    response
}

/// Single-origin CORS for GET, POST and preflight.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, HeraldError> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| HeraldError::Config(format!("invalid allowed_origin: {e}")))?;
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            header::AUTHORIZATION,
            request_id.clone(),
            header::CACHE_CONTROL,
        ])
        .expose_headers([request_id])
        .allow_credentials(false)
        .max_age(CORS_MAX_AGE))
}
