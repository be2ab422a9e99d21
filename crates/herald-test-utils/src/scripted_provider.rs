// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted provider adapter for deterministic orchestrator tests.
//!
//! `ScriptedProvider` replays a fixed classification result and a fixed
//! sequence of stream steps. Delays use `tokio::time`, so tests can run
//! with paused time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use tokio_util::sync::CancellationToken;

use herald_core::{
    AdapterType, ChatCompletion, HealthStatus, HeraldError, Intent, IntentKind, PluginAdapter,
    ProviderAdapter, ProviderChunk, ProviderStream, ToolCall,
};

/// One step of a scripted stream.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Yield a chunk.
    Chunk(ProviderChunk),
    /// Yield a provider error unit.
    Error(String),
    /// Wait before the next step.
    Delay(Duration),
    /// Yield nothing until cancelled.
    Hang,
}

#[derive(Debug, Default)]
struct Counters {
    classify_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    chunks_yielded: AtomicUsize,
}

/// A provider whose every answer is fixed up front.
pub struct ScriptedProvider {
    intent: Result<Intent, String>,
    open_error: Option<String>,
    steps: Vec<ScriptStep>,
    counters: Arc<Counters>,
    last_request: Mutex<Option<ChatCompletion>>,
    last_cancel: Mutex<Option<CancellationToken>>,
}

impl ScriptedProvider {
    /// Classifies everything as `qa_about_jai` at 0.9 and streams nothing.
    pub fn new() -> Self {
        Self {
            intent: Ok(Intent::new(IntentKind::QaAboutJai, 0.9)),
            open_error: None,
            steps: Vec::new(),
            counters: Arc::new(Counters::default()),
            last_request: Mutex::new(None),
            last_cancel: Mutex::new(None),
        }
    }

    pub fn with_intent(mut self, kind: IntentKind, confidence: f64) -> Self {
        self.intent = Ok(Intent::new(kind, confidence));
        self
    }

    /// Makes `classify_intent` fail with a provider error.
    pub fn with_classify_error(mut self, message: impl Into<String>) -> Self {
        self.intent = Err(message.into());
        self
    }

    /// Makes `stream_chat` fail before producing a stream.
    pub fn with_open_error(mut self, message: impl Into<String>) -> Self {
        self.open_error = Some(message.into());
        self
    }

    pub fn then(mut self, step: ScriptStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.then(ScriptStep::Chunk(ProviderChunk::Text(text.into())))
    }

    pub fn then_tool(self, tool: ToolCall) -> Self {
        self.then(ScriptStep::Chunk(ProviderChunk::ToolCall(tool)))
    }

    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.then(ScriptStep::Error(message.into()))
    }

    pub fn then_delay(self, delay: Duration) -> Self {
        self.then(ScriptStep::Delay(delay))
    }

    pub fn then_hang(self) -> Self {
        self.then(ScriptStep::Hang)
    }

    pub fn classify_calls(&self) -> usize {
        self.counters.classify_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.counters.stream_calls.load(Ordering::SeqCst)
    }

    /// Chunks and error units handed to the consumer so far.
    pub fn chunks_yielded(&self) -> usize {
        self.counters.chunks_yielded.load(Ordering::SeqCst)
    }

    /// True once the token handed to the latest `stream_chat` call fired.
    pub fn stream_cancelled(&self) -> bool {
        self.last_cancel
            .lock()
            .map(|guard| guard.as_ref().is_some_and(CancellationToken::is_cancelled))
            .unwrap_or(false)
    }

    /// The most recent request passed to `stream_chat`.
    pub fn last_request(&self) -> Option<ChatCompletion> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

struct StreamState {
    steps: VecDeque<ScriptStep>,
    cancel: CancellationToken,
    counters: Arc<Counters>,
}

#[async_trait]
impl PluginAdapter for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted-provider"
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
impl ProviderAdapter for ScriptedProvider {
    async fn classify_intent(&self, _text: &str) -> Result<Intent, HeraldError> {
        self.counters.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.intent.clone().map_err(|message| HeraldError::Provider {
            message,
            source: None,
        })
    }

    async fn stream_chat(
        &self,
        request: ChatCompletion,
        cancel: CancellationToken,
    ) -> Result<ProviderStream, HeraldError> {
        self.counters.stream_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request);
        }
        if let Ok(mut last) = self.last_cancel.lock() {
            *last = Some(cancel.clone());
        }
        if let Some(message) = &self.open_error {
            return Err(HeraldError::Provider {
                message: message.clone(),
                source: None,
            });
        }

        let state = StreamState {
            steps: self.steps.iter().cloned().collect(),
            cancel,
            counters: Arc::clone(&self.counters),
        };

        Ok(Box::pin(stream::unfold(state, |mut state| async move {
            loop {
                if state.cancel.is_cancelled() {
                    return None;
                }
                let step = state.steps.pop_front()?;
                match step {
                    ScriptStep::Chunk(chunk) => {
                        state.counters.chunks_yielded.fetch_add(1, Ordering::SeqCst);
                        return Some((Ok(chunk), state));
                    }
                    ScriptStep::Error(message) => {
                        state.counters.chunks_yielded.fetch_add(1, Ordering::SeqCst);
                        let err = HeraldError::Provider {
                            message,
                            source: None,
                        };
                        return Some((Err(err), state));
                    }
                    ScriptStep::Delay(delay) => {
                        tokio::select! {
                            _ = tokio::time::sleep(delay) => {}
                            _ = state.cancel.cancelled() => return None,
                        }
                    }
                    ScriptStep::Hang => {
                        state.cancel.cancelled().await;
                        return None;
                    }
                }
            }
        })))
    }
}
