// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for Herald.
//!
//! Implements [`ProviderAdapter`] over the Gemini `generateContent` API:
//! a unary call for intent classification and an SSE stream for chat.

pub mod client;
pub mod sse;
pub mod types;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use herald_config::model::ProviderConfig;
use herald_core::{
    AdapterType, ChatCompletion, HealthStatus, HeraldError, Intent, IntentKind, PluginAdapter,
    ProviderAdapter, ProviderChunk, ProviderStream, Role, SupportedTool, ToolCall,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::types::{
    Content, FunctionDeclaration, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, PropertySchema, Schema, Tool,
};

/// Environment variable consulted when the config carries no key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Confidence reported when the classifier reply cannot be parsed.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiProvider {
    client: GeminiClient,
    classify_temperature: f32,
    chat_temperature: f32,
}

impl GeminiProvider {
    /// Creates a provider from config. `request_timeout` bounds the
    /// classification call.
    pub fn new(config: &ProviderConfig, request_timeout: Duration) -> Result<Self, HeraldError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = GeminiClient::new(
            &api_key,
            config.base_url.clone(),
            config.model.clone(),
            request_timeout,
        )?;

        info!(model = %config.model, "Gemini provider initialized");

        Ok(Self {
            client,
            classify_temperature: config.classify_temperature,
            chat_temperature: config.chat_temperature,
        })
    }

    fn classify_request(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(classification_prompt(text))],
            tools: Vec::new(),
            generation_config: GenerationConfig {
                temperature: self.classify_temperature,
            },
        }
    }

    /// Maps the history to Gemini turns. The system context is folded into
    /// the latest user turn, since the stream carries no separate system slot.
    fn chat_request(&self, completion: &ChatCompletion) -> GenerateContentRequest {
        let last_user = completion
            .history
            .iter()
            .rposition(|m| m.role == Role::User);

        let contents = completion
            .history
            .iter()
            .enumerate()
            .filter_map(|(index, message)| match message.role {
                Role::User if Some(index) == last_user => Some(Content::user(format!(
                    "{}\n\nUser: {}",
                    completion.system_context, message.content
                ))),
                Role::User => Some(Content::user(message.content.clone())),
                Role::Assistant => Some(Content::model(message.content.clone())),
                Role::System => None,
            })
            .collect();

        GenerateContentRequest {
            contents,
            tools: vec![Tool {
                function_declarations: SupportedTool::ALL.iter().copied().map(declaration).collect(),
            }],
            generation_config: GenerationConfig {
                temperature: self.chat_temperature,
            },
        }
    }
}

fn resolve_api_key(config_key: Option<&str>) -> Result<String, HeraldError> {
    pick_api_key(config_key, std::env::var(API_KEY_ENV).ok())
}

fn pick_api_key(config_key: Option<&str>, env_key: Option<String>) -> Result<String, HeraldError> {
    if let Some(key) = config_key.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    env_key.filter(|k| !k.is_empty()).ok_or_else(|| {
        HeraldError::Config(format!(
            "Gemini API key not found. Set provider.api_key in config or {API_KEY_ENV} environment variable."
        ))
    })
}

fn classification_prompt(text: &str) -> String {
    format!(
        r#"Classify the following user message into one of these intents:
- qa_about_jai: Questions about Jai's background, experience, skills, work, projects
- schedule_meeting: Requests to book, schedule, or arrange meetings with Jai
- contact_links: Requests for contact information, email, phone, LinkedIn
- unknown: Anything else that doesn't fit the above categories

Message: "{text}"

Respond with a JSON object: {{"type": "intent_type", "confidence": 0.0-1.0}}"#
    )
}

/// Parses the classifier reply, tolerating a Markdown code fence.
///
/// An unparsable reply yields `unknown` at [`FALLBACK_CONFIDENCE`], which the
/// intent guardrail then refuses.
fn parse_intent(raw: &str) -> Intent {
    let body = raw.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .unwrap_or(body);
    let body = body.strip_suffix("```").unwrap_or(body).trim();

    match serde_json::from_str::<Intent>(body) {
        Ok(intent) => intent,
        Err(e) => {
            warn!(error = %e, "failed to parse intent classification, defaulting to unknown");
            Intent::new(IntentKind::Unknown, FALLBACK_CONFIDENCE)
        }
    }
}

fn declaration(tool: SupportedTool) -> FunctionDeclaration {
    let required = tool
        .required_parameters()
        .iter()
        .map(ToString::to_string)
        .collect();
    match tool {
        SupportedTool::ScheduleCalendlyMeeting => FunctionDeclaration {
            name: tool.to_string(),
            description: "Provide Jai's Calendly link for scheduling a 30-minute meeting".into(),
            parameters: Schema {
                kind: "OBJECT",
                properties: BTreeMap::from([
                    (
                        "meetingType".to_string(),
                        PropertySchema::string(
                            "Type of meeting requested (e.g., 'general meeting', 'consultation', 'interview')",
                        ),
                    ),
                    (
                        "requestorName".to_string(),
                        PropertySchema::string("Name of the person requesting the meeting"),
                    ),
                ]),
                required,
            },
        },
    }
}

/// Splits one streamed response into chunks, in part order.
fn response_chunks(response: GenerateContentResponse) -> Vec<Result<ProviderChunk, HeraldError>> {
    if let Some(reason) = response.block_reason() {
        return vec![Err(HeraldError::Provider {
            message: format!("prompt blocked by provider: {reason}"),
            source: None,
        })];
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Vec::new();
    };
    if let Some(reason) = &candidate.finish_reason {
        debug!(finish_reason = %reason, "candidate finished");
    }

    candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .filter(|part| !part.thought)
        .filter_map(|part| {
            if let Some(call) = part.function_call {
                let parameters = match call.args {
                    Some(serde_json::Value::Object(map)) => map,
                    _ => serde_json::Map::new(),
                };
                return Some(Ok(ProviderChunk::ToolCall(ToolCall {
                    name: call.name,
                    parameters,
                })));
            }
            part.text
                .filter(|text| !text.is_empty())
                .map(|text| Ok(ProviderChunk::Text(text)))
        })
        .collect()
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn classify_intent(&self, text: &str) -> Result<Intent, HeraldError> {
        let response = self
            .client
            .generate_content(&self.classify_request(text))
            .await?;

        let raw = response
            .first_candidate_text()
            .ok_or_else(|| HeraldError::Provider {
                message: "no candidates in classification response".into(),
                source: None,
            })?;

        let intent = parse_intent(&raw);
        debug!(intent = %intent.kind, confidence = intent.confidence, "intent classified");
        Ok(intent)
    }

    async fn stream_chat(
        &self,
        request: ChatCompletion,
        cancel: CancellationToken,
    ) -> Result<ProviderStream, HeraldError> {
        let body = self.chat_request(&request);
        let responses = self.client.stream_generate_content(&body).await?;

        let chunks = responses
            .flat_map(|item| {
                stream::iter(match item {
                    Ok(response) => response_chunks(response),
                    Err(e) => vec![Err(e)],
                })
            })
            .take_until(cancel.cancelled_owned());

        Ok(Box::pin(chunks))
    }
}
