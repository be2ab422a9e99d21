// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The provider side of a streaming turn.
//!
//! Runs as its own task, pulling units from the provider stream and pushing
//! them into a bounded channel. The orchestrator never awaits this task: it
//! fires the cancellation token and drops its receiver, and the producer
//! winds down on its own.

use std::sync::Arc;

use futures::StreamExt;
use herald_core::{ChatCompletion, HeraldError, ProviderAdapter, ProviderChunk};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub(crate) type Unit = Result<ProviderChunk, HeraldError>;

/// Opens the provider stream and forwards every unit until the stream ends,
/// an error unit has been forwarded, the receiver is gone, or `cancel` fires.
pub(crate) async fn produce(
    provider: Arc<dyn ProviderAdapter>,
    completion: ChatCompletion,
    cancel: CancellationToken,
    tx: mpsc::Sender<Unit>,
) {
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        opened = provider.stream_chat(completion, cancel.clone()) => opened,
    };

    let mut stream = match opened {
        Ok(stream) => stream,
        Err(e) => {
            let _ = tx.send(Err(e)).await;
            return;
        }
    };

    let mut forwarded = 0usize;
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = stream.next() => next,
        };
        let Some(unit) = next else { break };

        let terminal = unit.is_err();
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(unit) => sent,
        };
        if sent.is_err() || terminal {
            break;
        }
        forwarded += 1;
    }

    debug!(
        forwarded,
        cancelled = cancel.is_cancelled(),
        "provider producer finished"
    );
}
