// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestrator.
//!
//! One turn runs in two phases. [`Orchestrator::prepare`] does the cheap
//! checks and the single classification call, so malformed requests and
//! classifier failures surface as errors before any event is written.
//! [`Orchestrator::respond`] then writes protocol events to the caller's
//! sink: a refusal, or `connected` followed by the relayed provider stream.

use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use herald_config::model::StreamConfig;
use herald_core::{
    ChatCompletion, ChatRequest, ContentSource, ConversationMessage, HeraldError, Intent,
    IntentKind, ProtocolEvent, ProviderAdapter, ProviderChunk, SupportedTool, ToolCall,
};
use herald_guardrails::{GuardrailPipeline, Rejection};
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::producer::{Unit, produce};
use crate::prompt::PromptBuilder;
use crate::state::{ConversationState, Outcome};

/// Text sent in place of a `scheduleCalendlyMeeting` tool call.
pub const SCHEDULING_MESSAGE: &str = "You can schedule a 30-minute meeting with Jai using his Calendly link: https://calendly.com/jairathore/30min\n\nThis will allow you to pick a time that works for both of you. All meetings are scheduled in Pacific Time.";

/// Error event content when the stream deadline fires.
pub const TIMEOUT_MESSAGE: &str = "Stream timeout";

/// How long a stalled caller gets to make room for the timeout event.
const TIMEOUT_EVENT_GRACE: Duration = Duration::from_secs(1);

/// Error event content when the provider fails mid-stream.
pub const PROCESSING_ERROR_MESSAGE: &str = "Chat processing error";

/// Streaming limits for one turn.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    /// Deadline for the whole streaming phase.
    pub stream_timeout: Duration,
    /// Depth of the producer-to-orchestrator channel.
    pub channel_capacity: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&StreamConfig::default())
    }
}

impl From<&StreamConfig> for OrchestratorSettings {
    fn from(config: &StreamConfig) -> Self {
        Self {
            stream_timeout: config.timeout(),
            channel_capacity: config.channel_capacity.max(1),
        }
    }
}

/// A turn that passed the pre-stream checks and is ready to stream.
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    pub intent: Intent,
    pub history: Vec<ConversationMessage>,
    pub system_context: String,
    /// Reference text used by the advisory response check.
    pub grounding: String,
}

/// Result of [`Orchestrator::prepare`].
#[derive(Debug, Clone)]
pub enum Prepared {
    /// A guardrail rejected before streaming.
    Refused {
        intent: Option<Intent>,
        rejection: Rejection,
    },
    /// Ready to stream.
    Ready(PreparedTurn),
}

/// Sequences guardrails, classification, context assembly and streaming
/// for one request at a time. Cheap to share: every turn borrows it.
pub struct Orchestrator {
    provider: Arc<dyn ProviderAdapter>,
    content: Arc<dyn ContentSource>,
    guardrails: GuardrailPipeline,
    prompt: PromptBuilder,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        content: Arc<dyn ContentSource>,
        prompt: PromptBuilder,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            provider,
            content,
            guardrails: GuardrailPipeline::new(),
            prompt,
            settings,
        }
    }

    /// Replaces the default guardrail pipeline.
    pub fn with_guardrails(mut self, guardrails: GuardrailPipeline) -> Self {
        self.guardrails = guardrails;
        self
    }

    pub fn guardrails(&self) -> &GuardrailPipeline {
        &self.guardrails
    }

    pub fn settings(&self) -> OrchestratorSettings {
        self.settings
    }

    /// Runs a whole turn, writing events to `sink`.
    ///
    /// Errors are returned only for failures before the first event:
    /// a malformed request or a failed classification.
    pub async fn handle(
        &self,
        request: ChatRequest,
        sink: mpsc::Sender<ProtocolEvent>,
    ) -> Result<Outcome, HeraldError> {
        let prepared = self.prepare(request).await?;
        Ok(self.respond(prepared, sink).await)
    }

    /// Validates the request, classifies the latest user message and builds
    /// the system context. Writes no events.
    #[instrument(skip_all, fields(session_id = request.session_id.as_deref().unwrap_or("")))]
    pub async fn prepare(&self, request: ChatRequest) -> Result<Prepared, HeraldError> {
        let mut state = ConversationState::Received;

        request.validate()?;
        let Some(text) = request.last_user_message() else {
            return Err(HeraldError::Validation("No user message found".to_string()));
        };

        if let Err(rejection) = self.guardrails.validate_input(text) {
            return Ok(Prepared::Refused {
                intent: None,
                rejection,
            });
        }
        advance(&mut state, ConversationState::InputValidated);

        let intent = self.provider.classify_intent(text).await.inspect_err(|e| {
            error!(error = %e, "intent classification failed");
        })?;
        advance(&mut state, ConversationState::IntentClassified);
        info!(
            intent = %intent.kind,
            confidence = intent.confidence,
            "intent classified"
        );

        if let Err(rejection) = self.guardrails.validate_intent(Some(&intent)) {
            return Ok(Prepared::Refused {
                intent: Some(intent),
                rejection,
            });
        }
        advance(&mut state, ConversationState::IntentValidated);

        let documents = match intent.kind {
            IntentKind::QaAboutJai => self.content.all_documents(),
            IntentKind::ScheduleMeeting | IntentKind::ContactLinks | IntentKind::Unknown => {
                Vec::new()
            }
        };
        let system_context = self.prompt.assemble(intent.kind, &documents, Utc::now());
        let grounding = documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        advance(&mut state, ConversationState::ContextAssembled);
        debug!(
            documents = documents.len(),
            context_len = system_context.len(),
            "context assembled"
        );

        Ok(Prepared::Ready(PreparedTurn {
            intent,
            history: request.messages,
            system_context,
            grounding,
        }))
    }

    /// Writes the events for a prepared turn and returns how it ended.
    pub async fn respond(&self, prepared: Prepared, sink: mpsc::Sender<ProtocolEvent>) -> Outcome {
        match prepared {
            Prepared::Refused { intent, rejection } => {
                info!(
                    checkpoint = %rejection.checkpoint,
                    reason = %rejection.reason,
                    "turn refused"
                );
                let _ = sink
                    .send(ProtocolEvent::guardrail(self.guardrails.refusal_message()))
                    .await;
                Outcome::new(ConversationState::Refused, intent)
            }
            Prepared::Ready(turn) => self.stream(turn, sink).await,
        }
    }

    #[instrument(skip_all, fields(intent = %turn.intent.kind))]
    async fn stream(&self, turn: PreparedTurn, sink: mpsc::Sender<ProtocolEvent>) -> Outcome {
        let started = Instant::now();
        let PreparedTurn {
            intent,
            history,
            system_context,
            grounding,
        } = turn;
        let mut outcome = Outcome::new(ConversationState::Streaming, Some(intent));

        // Bounds the whole stream, including writes to a caller that stopped reading.
        let deadline = tokio::time::sleep(self.settings.stream_timeout);
        tokio::pin!(deadline);

        match deliver(&sink, ProtocolEvent::connected(), deadline.as_mut()).await {
            Delivery::Sent => {}
            Delivery::Closed => {
                outcome.state = ConversationState::Errored;
                return outcome;
            }
            Delivery::Expired => {
                outcome.state = self.expire(&sink).await;
                return outcome;
            }
        }

        // Fires on every exit path, including this future being dropped.
        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();

        let (tx, mut rx) = mpsc::channel::<Unit>(self.settings.channel_capacity);
        let completion = ChatCompletion {
            history,
            system_context,
        };
        tokio::spawn(produce(
            Arc::clone(&self.provider),
            completion,
            cancel.clone(),
            tx,
        ));

        let mut response = String::new();
        let state = loop {
            let unit = tokio::select! {
                biased;
                _ = &mut deadline => break self.expire(&sink).await,
                unit = rx.recv() => unit,
            };

            // The event to write, and the state to end in once it is written.
            let (event, terminal) = match unit {
                None => break ConversationState::Completed,
                Some(Err(e)) => {
                    error!(error = %e, "provider stream failed");
                    (
                        ProtocolEvent::error(PROCESSING_ERROR_MESSAGE),
                        Some(ConversationState::Errored),
                    )
                }
                Some(Ok(ProviderChunk::Text(text))) => {
                    response.push_str(&text);
                    (ProtocolEvent::text(text), None)
                }
                Some(Ok(ProviderChunk::ToolCall(tool))) => match self.intercept_tool(tool) {
                    Step::Emit(event) => (event, None),
                    Step::Refuse => (
                        ProtocolEvent::guardrail(self.guardrails.refusal_message()),
                        Some(ConversationState::Refused),
                    ),
                },
            };

            match deliver(&sink, event, deadline.as_mut()).await {
                Delivery::Sent => {
                    if let Some(state) = terminal {
                        break state;
                    }
                }
                Delivery::Closed => {
                    debug!("caller went away mid-stream");
                    break terminal.unwrap_or(ConversationState::Errored);
                }
                Delivery::Expired => break self.expire(&sink).await,
            }
        };

        cancel.cancel();
        drop(rx);

        outcome.state = state;
        outcome.response_chars = response.chars().count();

        if state == ConversationState::Completed
            && let Some(intent) = outcome.intent
            && let Err(rejection) =
                self.guardrails
                    .validate_response(&response, intent.kind, &grounding)
        {
            warn!(
                reason = %rejection.reason,
                "completed response failed advisory response check"
            );
        }

        info!(
            state = %state,
            duration_ms = started.elapsed().as_millis() as u64,
            response_len = outcome.response_chars,
            "chat stream finished"
        );
        outcome
    }

    /// Writes the timeout event, waiting at most [`TIMEOUT_EVENT_GRACE`] for
    /// room in the sink.
    async fn expire(&self, sink: &mpsc::Sender<ProtocolEvent>) -> ConversationState {
        warn!(timeout = ?self.settings.stream_timeout, "stream deadline reached");
        if sink
            .send_timeout(ProtocolEvent::error(TIMEOUT_MESSAGE), TIMEOUT_EVENT_GRACE)
            .await
            .is_err()
        {
            debug!("timeout event not delivered");
        }
        ConversationState::TimedOut
    }

    /// Validates a provider tool call and decides what the caller sees.
    fn intercept_tool(&self, tool: ToolCall) -> Step {
        if self.guardrails.validate_tool(Some(&tool)).is_err() {
            return Step::Refuse;
        }
        info!(tool = %tool.name, "tool call proposed");

        match SupportedTool::from_name(&tool.name) {
            Some(SupportedTool::ScheduleCalendlyMeeting) => {
                Step::Emit(ProtocolEvent::text(SCHEDULING_MESSAGE))
            }
            None => Step::Emit(ProtocolEvent::tool_call(tool)),
        }
    }
}

/// Result of writing one event to the caller.
enum Delivery {
    Sent,
    Closed,
    Expired,
}

/// Writes `event` unless the deadline fires first.
async fn deliver(
    sink: &mpsc::Sender<ProtocolEvent>,
    event: ProtocolEvent,
    deadline: Pin<&mut Sleep>,
) -> Delivery {
    tokio::select! {
        biased;
        _ = deadline => Delivery::Expired,
        sent = sink.send(event) => match sent {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Closed,
        },
    }
}

/// What the stream loop does with one provider unit.
enum Step {
    Emit(ProtocolEvent),
    Refuse,
}

fn advance(state: &mut ConversationState, next: ConversationState) {
    debug!(from = %state, to = %next, "state transition");
    *state = next;
}
