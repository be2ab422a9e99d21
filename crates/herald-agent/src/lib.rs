// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for the Herald gateway.
//!
//! The [`Orchestrator`] drives one request through its lifecycle: input
//! guardrail, intent classification, intent guardrail, context assembly,
//! then a deadline-bounded relay of the provider stream with tool-call
//! interception. A separate producer task feeds it through a bounded
//! channel; a single cancellation token tells the producer to stop.

pub mod orchestrator;
mod producer;
pub mod prompt;
pub mod shutdown;
pub mod state;

pub use orchestrator::{
    Orchestrator, OrchestratorSettings, PROCESSING_ERROR_MESSAGE, Prepared, PreparedTurn,
    SCHEDULING_MESSAGE, TIMEOUT_MESSAGE,
};
pub use prompt::{CONTEXT_HEADING, PromptBuilder};
pub use state::{ConversationState, Outcome};
