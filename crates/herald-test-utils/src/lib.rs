// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Herald integration tests.
//!
//! # Components
//!
//! - [`ScriptedProvider`] - provider adapter replaying a fixed script
//! - [`InMemoryContent`] - content source built in code
//! - [`TestHarness`] - orchestrator wired to both, one call per turn
//! - [`parse_sse_events`] - decodes an SSE body back into protocol events

pub mod content;
pub mod harness;
pub mod scripted_provider;
pub mod sse;

pub use content::InMemoryContent;
pub use harness::{TestHarness, TurnResult};
pub use scripted_provider::{ScriptStep, ScriptedProvider};
pub use sse::{collect_events, parse_sse_events};
