// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request lifecycle states.

use herald_core::Intent;

/// States of one conversational turn, in order of progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// Request accepted by the transport, nothing checked yet.
    Received,
    /// Structure and input guardrail passed.
    InputValidated,
    /// The provider classified the latest user message.
    IntentClassified,
    /// Intent guardrail passed.
    IntentValidated,
    /// System context built for the intent.
    ContextAssembled,
    /// Provider output is being relayed.
    Streaming,
    /// Provider stream ended cleanly.
    Completed,
    /// A guardrail rejected; one `guardrail` event was sent.
    Refused,
    /// The provider failed or the caller went away.
    Errored,
    /// The stream deadline fired before the provider finished.
    TimedOut,
}

impl ConversationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ConversationState::Completed
                | ConversationState::Refused
                | ConversationState::Errored
                | ConversationState::TimedOut
        )
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationState::Received => write!(f, "received"),
            ConversationState::InputValidated => write!(f, "input_validated"),
            ConversationState::IntentClassified => write!(f, "intent_classified"),
            ConversationState::IntentValidated => write!(f, "intent_validated"),
            ConversationState::ContextAssembled => write!(f, "context_assembled"),
            ConversationState::Streaming => write!(f, "streaming"),
            ConversationState::Completed => write!(f, "completed"),
            ConversationState::Refused => write!(f, "refused"),
            ConversationState::Errored => write!(f, "errored"),
            ConversationState::TimedOut => write!(f, "timed_out"),
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Always a terminal state.
    pub state: ConversationState,
    /// The classified intent, when classification ran.
    pub intent: Option<Intent>,
    /// Characters of provider text relayed to the caller.
    pub response_chars: usize,
}

impl Outcome {
    pub(crate) fn new(state: ConversationState, intent: Option<Intent>) -> Self {
        Self {
            state,
            intent,
            response_chars: 0,
        }
    }
}
