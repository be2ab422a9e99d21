// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-scoped types shared by the guardrails, the orchestrator, provider
//! adapters and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::HeraldError;

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of the inbound conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Inbound payload for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationMessage>,
    #[serde(default, rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Checks the structural invariants of the request.
    ///
    /// The sequence must be non-empty, every turn must carry content, and at
    /// least one turn must be user-authored. Whitespace-only content passes
    /// here; the input guardrail is responsible for rejecting it.
    pub fn validate(&self) -> Result<(), HeraldError> {
        if self.messages.is_empty() {
            return Err(HeraldError::Validation(
                "Messages array cannot be empty".to_string(),
            ));
        }

        if let Some(index) = self.messages.iter().position(|m| m.content.is_empty()) {
            return Err(HeraldError::Validation(format!(
                "messages[{index}].content is required"
            )));
        }

        if self.last_user_message().is_none() {
            return Err(HeraldError::Validation("No user message found".to_string()));
        }

        Ok(())
    }

    /// Returns the content of the most recent user-authored turn.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Classified purpose of a user utterance.
///
/// Wire names that are not recognised decode to [`IntentKind::Unknown`], so a
/// classifier inventing a new label can never widen the allow-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntentKind {
    QaAboutJai,
    ScheduleMeeting,
    ContactLinks,
    #[serde(other)]
    Unknown,
}

/// Classifier result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "type")]
    pub kind: IntentKind,
    #[serde(default)]
    pub confidence: f64,
}

impl Intent {
    pub fn new(kind: IntentKind, confidence: f64) -> Self {
        Self { kind, confidence }
    }
}

/// A structured action request emitted by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: serde_json::Map::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }
}

/// The closed set of tools the provider may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum SupportedTool {
    #[strum(serialize = "scheduleCalendlyMeeting")]
    ScheduleCalendlyMeeting,
}

impl SupportedTool {
    /// Every supported tool, for declaring function schemas to a provider.
    pub const ALL: &'static [SupportedTool] = &[SupportedTool::ScheduleCalendlyMeeting];

    /// Resolves a provider-supplied tool name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Parameters that must be present for a call to be accepted.
    pub fn required_parameters(self) -> &'static [&'static str] {
        match self {
            SupportedTool::ScheduleCalendlyMeeting => &["meetingType"],
        }
    }
}

/// Kind tag of a [`ProtocolEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Connected,
    Text,
    ToolCall,
    Guardrail,
    Error,
}

/// One unit of the caller-visible streamed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolEvent {
    pub role: Role,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolCall>,
}

impl ProtocolEvent {
    fn assistant(kind: EventKind, content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            kind,
            tool: None,
        }
    }

    /// Stream-start marker, sent before any provider content.
    pub fn connected() -> Self {
        Self::assistant(EventKind::Connected, "")
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::assistant(EventKind::Text, content)
    }

    pub fn tool_call(tool: ToolCall) -> Self {
        Self {
            tool: Some(tool),
            ..Self::assistant(EventKind::ToolCall, "")
        }
    }

    pub fn guardrail(content: impl Into<String>) -> Self {
        Self::assistant(EventKind::Guardrail, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::assistant(EventKind::Error, content)
    }

    /// Serializes the event to the JSON object carried in one SSE `data:` line.
    pub fn to_json(&self) -> Result<String, HeraldError> {
        serde_json::to_string(self)
            .map_err(|e| HeraldError::Internal(format!("failed to encode protocol event: {e}")))
    }

    /// Encodes the event as a complete `data: <json>\n\n` frame.
    pub fn to_frame(&self) -> Result<String, HeraldError> {
        Ok(format!("data: {}\n\n", self.to_json()?))
    }
}

/// A static knowledge unit owned by the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    pub id: String,
    pub path: String,
    pub topic_hints: Vec<String>,
    pub content: String,
    /// Lowercase hex SHA-256 of the file bytes.
    pub checksum: String,
}

/// A single unit produced by a provider's chat stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderChunk {
    Text(String),
    ToolCall(ToolCall),
}

/// Input to a streaming chat completion.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// Full inbound history, oldest first.
    pub history: Vec<ConversationMessage>,
    /// System prompt plus any assembled reference context.
    pub system_context: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(messages: Vec<ConversationMessage>) -> ChatRequest {
        ChatRequest {
            messages,
            session_id: None,
        }
    }

    #[test]
    fn chat_request_deserializes_session_id() {
        let json = r#"{"messages":[{"role":"user","content":"hi"}],"sessionId":"s-1"}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.session_id.as_deref(), Some("s-1"));
        assert_eq!(req.messages[0].role, Role::User);
    }

    #[test]
    fn chat_request_rejects_unknown_role() {
        let json = r#"{"messages":[{"role":"tool","content":"hi"}]}"#;
        assert!(serde_json::from_str::<ChatRequest>(json).is_err());
    }

    #[test]
    fn validate_rejects_empty_history() {
        let err = request(vec![]).validate().unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn validate_rejects_history_without_user_turn() {
        let err = request(vec![ConversationMessage::assistant("hello")])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("No user message"));
    }

    #[test]
    fn validate_rejects_empty_content() {
        let err = request(vec![ConversationMessage::user("")])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("messages[0].content"));
    }

    #[test]
    fn validate_accepts_whitespace_content() {
        assert!(request(vec![ConversationMessage::user("   ")]).validate().is_ok());
    }

    #[test]
    fn last_user_message_picks_latest_user_turn() {
        let req = request(vec![
            ConversationMessage::user("first"),
            ConversationMessage::assistant("reply"),
            ConversationMessage::user("second"),
            ConversationMessage::assistant("another reply"),
        ]);
        assert_eq!(req.last_user_message(), Some("second"));
    }

    #[test]
    fn intent_decodes_wire_names() {
        let intent: Intent =
            serde_json::from_str(r#"{"type":"schedule_meeting","confidence":0.8}"#).unwrap();
        assert_eq!(intent.kind, IntentKind::ScheduleMeeting);
        assert_eq!(intent.confidence, 0.8);
    }

    #[test]
    fn unrecognised_intent_decodes_to_unknown() {
        let intent: Intent =
            serde_json::from_str(r#"{"type":"order_pizza","confidence":1.0}"#).unwrap();
        assert_eq!(intent.kind, IntentKind::Unknown);
    }

    #[test]
    fn supported_tool_matches_exact_name_only() {
        assert_eq!(
            SupportedTool::from_name("scheduleCalendlyMeeting"),
            Some(SupportedTool::ScheduleCalendlyMeeting)
        );
        assert_eq!(SupportedTool::from_name("schedulecalendlymeeting"), None);
        assert_eq!(
            SupportedTool::ScheduleCalendlyMeeting.to_string(),
            "scheduleCalendlyMeeting"
        );
    }

    #[test]
    fn protocol_event_wire_shape() {
        let json = ProtocolEvent::text("Jai ").to_json().unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Jai ","type":"text"}"#);

        let tool = ToolCall::new("lookup").with_parameter("q", serde_json::json!("x"));
        let json = ProtocolEvent::tool_call(tool).to_json().unwrap();
        assert!(json.contains(r#""type":"tool_call""#));
        assert!(json.contains(r#""tool":{"name":"lookup","parameters":{"q":"x"}}"#));
    }

    #[test]
    fn protocol_event_frame_is_data_line() {
        let frame = ProtocolEvent::connected().to_frame().unwrap();
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("}\n\n"));
        assert!(frame.contains(r#""type":"connected""#));
    }
}
