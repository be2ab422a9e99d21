// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guardrail outcomes.
//!
//! A rejection is not an error in the `HeraldError` sense: the orchestrator
//! turns it into a single `guardrail` protocol event carrying the fixed
//! refusal text. The reason is kept for logs and tests only and is never
//! shown to the caller.

use herald_core::IntentKind;
use strum::Display;

/// Where in the request lifecycle a guardrail ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Checkpoint {
    Input,
    Intent,
    Tool,
    Response,
}

/// Why a checkpoint rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectReason {
    #[error("input is empty")]
    EmptyInput,

    #[error("input too long: {len} characters (max {max})")]
    InputTooLong { len: usize, max: usize },

    #[error("input contains blocked phrase `{0}`")]
    BlockedPhrase(&'static str),

    #[error("input matches blocked pattern `{0}`")]
    BlockedPattern(String),

    #[error("intent is missing")]
    MissingIntent,

    #[error("intent `{0}` is not allowed")]
    IntentNotAllowed(IntentKind),

    #[error("intent confidence too low: {confidence:.2} (min {threshold:.2})")]
    LowConfidence { confidence: f64, threshold: f64 },

    #[error("tool call is missing")]
    MissingTool,

    #[error("tool `{0}` is not allowed")]
    ToolNotAllowed(String),

    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("parameter `{0}` cannot be null")]
    NullParameter(String),

    #[error("parameter `{0}` must be a string")]
    NonStringParameter(String),

    #[error("response discloses `{0}`")]
    MetaDisclosure(&'static str),

    #[error("response does not refer to the subject in third person")]
    NotThirdPerson,
}

/// A failed checkpoint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{checkpoint} guardrail rejected: {reason}")]
pub struct Rejection {
    pub checkpoint: Checkpoint,
    pub reason: RejectReason,
}

impl Rejection {
    pub fn new(checkpoint: Checkpoint, reason: RejectReason) -> Self {
        Self { checkpoint, reason }
    }
}

/// All-or-nothing result of one checkpoint.
pub type Verdict = Result<(), Rejection>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_display_names_checkpoint_and_reason() {
        let rejection = Rejection::new(
            Checkpoint::Intent,
            RejectReason::IntentNotAllowed(IntentKind::Unknown),
        );
        assert_eq!(
            rejection.to_string(),
            "intent guardrail rejected: intent `unknown` is not allowed"
        );
    }

    #[test]
    fn low_confidence_formats_two_decimals() {
        let reason = RejectReason::LowConfidence {
            confidence: 0.123,
            threshold: 0.3,
        };
        assert_eq!(
            reason.to_string(),
            "intent confidence too low: 0.12 (min 0.30)"
        );
    }
}
