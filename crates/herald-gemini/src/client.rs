// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Calls are issued once. A failed call is reported to the caller and never
//! retried.

use std::time::Duration;

use herald_core::HeraldError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::sse::{self, ResponseStream};
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    request_timeout: Duration,
}

impl GeminiClient {
    /// Builds a client that authenticates with `x-goog-api-key`.
    ///
    /// `request_timeout` bounds unary calls only. Streams are bounded by the
    /// caller's deadline.
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, HeraldError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| HeraldError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| HeraldError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            request_timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{method}", self.base_url, self.model)
    }

    /// Sends a unary request and returns the full response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, HeraldError> {
        let response = self
            .client
            .post(self.endpoint("generateContent"))
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await.map_err(|e| HeraldError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| HeraldError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Opens a streaming request. Each SSE event carries one partial response.
    pub async fn stream_generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<ResponseStream, HeraldError> {
        let response = self
            .client
            .post(self.endpoint("streamGenerateContent"))
            .query(&[("alt", "sse")])
            .json(request)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "streaming response received");
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        Ok(sse::parse_sse_stream(response))
    }
}

fn request_failed(e: reqwest::Error) -> HeraldError {
    HeraldError::Provider {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn api_error(response: reqwest::Response) -> HeraldError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(err) => format!(
            "Gemini API error ({} {}): {}",
            err.error.code, err.error.status, err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    };
    HeraldError::Provider {
        message,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_model_and_method() {
        let client = GeminiClient::new(
            "key",
            "https://example.test/v1beta/",
            "gemini-2.5-pro",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("generateContent"),
            "https://example.test/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn rejects_api_key_with_control_characters() {
        let err = GeminiClient::new("bad\nkey", "http://x", "m", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)));
    }
}
