// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic guardrails for the Herald gateway.
//!
//! Every check here is pure, so the orchestrator runs them before any
//! provider call that could be wasted on a rejected request.

pub mod grounding;
pub mod pipeline;
pub mod rules;
pub mod sanitize;
pub mod verdict;

pub use grounding::{GroundingReport, grounding_overlap};
pub use pipeline::{GuardrailPipeline, MIN_INTENT_CONFIDENCE, REFUSAL_MESSAGE};
pub use rules::{InputRule, default_input_rules};
pub use sanitize::sanitize_html;
pub use verdict::{Checkpoint, RejectReason, Rejection, Verdict};
