// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM integrations.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::HeraldError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatCompletion, Intent, ProviderChunk};

/// A chunked chat completion. An `Err` item is terminal for the stream.
pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<ProviderChunk, HeraldError>> + Send>>;

/// Adapter for an external LLM provider.
///
/// Implementations must not retry: a single failed call is terminal for the
/// request that issued it.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Classifies the purpose of one user utterance.
    async fn classify_intent(&self, text: &str) -> Result<Intent, HeraldError>;

    /// Opens a streaming chat completion.
    ///
    /// `cancel` is fired by the consumer when it stops reading (deadline,
    /// guardrail rejection, caller gone). The provider should observe it and
    /// release upstream resources; the consumer never awaits that release.
    async fn stream_chat(
        &self,
        request: ChatCompletion,
        cancel: CancellationToken,
    ) -> Result<ProviderStream, HeraldError>;
}
