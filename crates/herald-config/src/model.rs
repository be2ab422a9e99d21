// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a mistyped key fails
//! startup instead of silently falling back to a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Herald configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeraldConfig {
    /// HTTP listener and response header settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Knowledge document location.
    #[serde(default)]
    pub content: ContentConfig,

    /// Streaming deadlines and channel sizing.
    #[serde(default)]
    pub stream: StreamConfig,

    /// Per-route request rate limits.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Contact links of the represented person.
    #[serde(default)]
    pub subject: SubjectConfig,

    /// Logging settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Single origin allowed by CORS.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Deployment environment label (development, production).
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Build identifier reported by `/healthz`.
    #[serde(default = "default_build_sha")]
    pub build_sha: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
            environment: default_environment(),
            build_sha: default_build_sha(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_build_sha() -> String {
    "local".to_string()
}

/// Gemini provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_classify_temperature")]
    pub classify_temperature: f32,

    #[serde(default = "default_chat_temperature")]
    pub chat_temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            classify_temperature: default_classify_temperature(),
            chat_temperature: default_chat_temperature(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_classify_temperature() -> f32 {
    0.3
}

fn default_chat_temperature() -> f32 {
    0.7
}

/// Content store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory holding `packs.json` and the pack files.
    #[serde(default = "default_content_dir")]
    pub dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
        }
    }
}

fn default_content_dir() -> String {
    "../content".to_string()
}

/// Streaming configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    /// Deadline for the whole streaming phase of one request.
    #[serde(default = "default_stream_timeout_secs")]
    pub timeout_secs: u64,

    /// Deadline for non-streaming routes.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Depth of the producer-to-orchestrator chunk channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl StreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_stream_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_stream_timeout_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_channel_capacity() -> usize {
    16
}

/// Fixed-window rate limit for `POST /chat`, keyed by client address.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    #[serde(default = "default_chat_limit")]
    pub chat_limit: u32,

    #[serde(default = "default_chat_window_secs")]
    pub chat_window_secs: u64,
}

impl RateLimitConfig {
    pub fn chat_window(&self) -> Duration {
        Duration::from_secs(self.chat_window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            chat_limit: default_chat_limit(),
            chat_window_secs: default_chat_window_secs(),
        }
    }
}

fn default_chat_limit() -> u32 {
    60
}

fn default_chat_window_secs() -> u64 {
    300
}

/// Contact details of the represented person, quoted in the system prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectConfig {
    #[serde(default = "default_email")]
    pub email: String,

    #[serde(default = "default_linkedin")]
    pub linkedin: String,

    #[serde(default = "default_x")]
    pub x: String,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            email: default_email(),
            linkedin: default_linkedin(),
            x: default_x(),
        }
    }
}

fn default_email() -> String {
    "jaiadityarathore@gmail.com".to_string()
}

fn default_linkedin() -> String {
    "https://www.linkedin.com/in/jrathore".to_string()
}

fn default_x() -> String {
    "https://x.com/Jai_A_Rathore".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Default filter directive (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit newline-delimited JSON instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
