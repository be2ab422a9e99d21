// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end orchestrator tests.
//!
//! `TestHarness` wires an [`Orchestrator`] to a [`ScriptedProvider`] and an
//! [`InMemoryContent`], runs one turn, and hands back every event written.

use std::sync::Arc;
use std::time::Duration;

use herald_agent::{Orchestrator, OrchestratorSettings, Outcome, PromptBuilder};
use herald_config::model::SubjectConfig;
use herald_core::{ChatRequest, ConversationMessage, HeraldError, ProtocolEvent};
use tokio::sync::mpsc;

use crate::content::InMemoryContent;
use crate::scripted_provider::ScriptedProvider;
use crate::sse::collect_events;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    provider: ScriptedProvider,
    content: InMemoryContent,
    settings: OrchestratorSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            provider: ScriptedProvider::new(),
            content: InMemoryContent::new(),
            settings: OrchestratorSettings {
                stream_timeout: Duration::from_secs(30),
                channel_capacity: 16,
            },
        }
    }

    pub fn with_provider(mut self, provider: ScriptedProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_content(mut self, content: InMemoryContent) -> Self {
        self.content = content;
        self
    }

    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.settings.stream_timeout = timeout;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.settings.channel_capacity = capacity;
        self
    }

    pub fn build(self) -> TestHarness {
        let provider = Arc::new(self.provider);
        let orchestrator = Orchestrator::new(
            provider.clone(),
            Arc::new(self.content),
            PromptBuilder::new(SubjectConfig::default()),
            self.settings,
        );
        TestHarness {
            orchestrator: Arc::new(orchestrator),
            provider,
        }
    }
}

/// Everything a turn produced.
#[derive(Debug)]
pub struct TurnResult {
    pub outcome: Outcome,
    pub events: Vec<ProtocolEvent>,
}

/// An orchestrator plus handles to its scripted collaborators.
pub struct TestHarness {
    pub orchestrator: Arc<Orchestrator>,
    pub provider: Arc<ScriptedProvider>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Runs one turn with a single user message.
    pub async fn send(&self, text: &str) -> Result<TurnResult, HeraldError> {
        self.send_request(ChatRequest {
            messages: vec![ConversationMessage::user(text)],
            session_id: None,
        })
        .await
    }

    /// Runs one turn and collects its events.
    pub async fn send_request(&self, request: ChatRequest) -> Result<TurnResult, HeraldError> {
        let (tx, rx) = mpsc::channel(16);
        let (outcome, events) =
            tokio::join!(self.orchestrator.handle(request, tx), collect_events(rx));
        Ok(TurnResult {
            outcome: outcome?,
            events,
        })
    }
}
