// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Herald gateway.

use thiserror::Error;

/// The error type shared by adapters, the orchestrator, and the gateway.
///
/// Guardrail rejections are deliberately absent: a rejected input, intent, or
/// tool call is an expected outcome that becomes a protocol event, not an error.
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Configuration errors (missing API key, unreadable settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Structurally malformed inbound request (empty history, no user turn).
    #[error("invalid request: {0}")]
    Validation(String),

    /// LLM provider errors (transport failure, API error, undecodable payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Content store errors (missing manifest, unreadable pack).
    #[error("content error: {message}")]
    Content {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HeraldError {
    /// Returns true when the error was caused by the caller's payload.
    pub fn is_client_error(&self) -> bool {
        matches!(self, HeraldError::Validation(_))
    }
}
