// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Router, middleware};
use herald_agent::Orchestrator;
use herald_config::HeraldConfig;
use herald_config::model::ServerConfig;
use herald_core::{ContentSource, HeraldError};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, info_span};

use crate::error::ApiError;
use crate::handlers;
use crate::rate_limit::{RateLimiter, rate_limit};
use crate::security::{REQUEST_ID_HEADER, SecurityHeaders, cors_layer, security_headers};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
    /// Read for `/healthz` checksums.
    pub content: Arc<dyn ContentSource>,
    pub build_sha: Arc<str>,
    /// Contact address quoted in the privacy notice.
    pub contact_email: Arc<str>,
    /// Depth of the per-request event channel between orchestrator and
    /// response body.
    pub event_buffer: usize,
}

impl GatewayState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        content: Arc<dyn ContentSource>,
        config: &HeraldConfig,
    ) -> Self {
        Self {
            orchestrator,
            content,
            build_sha: config.server.build_sha.as_str().into(),
            contact_email: config.subject.email.as_str().into(),
            event_buffer: config.stream.channel_capacity.max(1),
        }
    }
}

/// Builds the application router.
///
/// - POST /chat (rate limited, streams events)
/// - GET /healthz, GET /privacy (request timeout)
///
/// Every route is wrapped in request-id tagging, tracing, panic recovery,
/// CORS and security headers.
pub fn build_router(state: GatewayState, config: &HeraldConfig) -> Result<Router, HeraldError> {
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.chat_limit,
        config.rate_limit.chat_window(),
    ));

    let chat_routes = Router::new()
        .route("/chat", post(handlers::post_chat))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit));

    let page_routes = Router::new()
        .route("/healthz", get(handlers::get_health))
        .route("/privacy", get(handlers::get_privacy))
        .layer(TimeoutLayer::new(config.stream.request_timeout()));

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                path = %request.uri().path(),
            )
        })
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let security = SecurityHeaders::new(&config.server.allowed_origin)?;

    Ok(Router::new()
        .merge(chat_routes)
        .merge(page_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(trace)
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors_layer(&config.server.allowed_origin)?)
                .layer(middleware::from_fn_with_state(security, security_headers)),
        ))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "panic recovered");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Binds `host:port` and serves until `shutdown` fires.
///
/// Open streams are allowed to finish; each is bounded by the stream
/// deadline.
pub async fn serve(
    config: &ServerConfig,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), HeraldError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HeraldError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!(addr = %addr, environment = %config.environment, "gateway listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await
    .map_err(|e| HeraldError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_handler_returns_json_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("owned boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
