// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Herald gateway.
//!
//! Holds the request-scoped data model, the protocol event encoding, the
//! shared error type, and the adapter traits the orchestrator consumes.

pub mod error;
pub mod traits;
pub mod types;

pub use error::HeraldError;
pub use traits::{ContentSource, PluginAdapter, ProviderAdapter, ProviderStream};
pub use types::{
    AdapterType, ChatCompletion, ChatRequest, ContentDocument, ConversationMessage, EventKind,
    HealthStatus, Intent, IntentKind, ProtocolEvent, ProviderChunk, Role, SupportedTool,
    ToolCall,
};
