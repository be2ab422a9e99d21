// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE parsing for `streamGenerateContent?alt=sse`.
//!
//! Every `data:` line is a complete [`GenerateContentResponse`]. Events are
//! unnamed, so the parser keys only on the payload.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use herald_core::HeraldError;

use crate::types::GenerateContentResponse;

pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, HeraldError>> + Send>>;

pub fn parse_sse_stream(response: reqwest::Response) -> ResponseStream {
    let events = response.bytes_stream().eventsource();

    let mapped = events.filter_map(|result| async move {
        match result {
            Ok(event) if event.data.trim().is_empty() => None,
            Ok(event) => Some(
                serde_json::from_str::<GenerateContentResponse>(&event.data).map_err(|e| {
                    HeraldError::Provider {
                        message: format!("failed to parse stream event: {e}"),
                        source: Some(Box::new(e)),
                    }
                }),
            ),
            Err(e) => Some(Err(HeraldError::Provider {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}
