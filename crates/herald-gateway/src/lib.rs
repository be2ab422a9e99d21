// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of the Herald gateway.
//!
//! `POST /chat` answers with a `text/event-stream` of protocol events, one
//! `data:` frame each. Requests that fail before streaming starts get a
//! JSON error body instead.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod security;
pub mod server;

pub use error::{ApiError, PROCESSING_FAILED};
pub use rate_limit::{Decision, RateLimiter};
pub use server::{GatewayState, build_router, serve};
