// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers for reading protocol events back out of responses and channels.

use herald_core::ProtocolEvent;
use tokio::sync::mpsc;

/// Parses a `text/event-stream` body into protocol events.
///
/// Only `data:` lines are read; comments and other fields are skipped.
///
/// # Panics
///
/// Panics if a `data:` payload is not a protocol event.
pub fn parse_sse_events(body: &str) -> Vec<ProtocolEvent> {
    body.split("\n\n")
        .flat_map(|frame| frame.lines())
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| {
            serde_json::from_str(data.trim_start())
                .unwrap_or_else(|e| panic!("invalid protocol event `{data}`: {e}"))
        })
        .collect()
}

/// Drains a receiver until every sender is gone.
pub async fn collect_events(mut rx: mpsc::Receiver<ProtocolEvent>) -> Vec<ProtocolEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::EventKind;

    #[test]
    fn parses_data_frames() {
        let body = "data: {\"role\":\"assistant\",\"content\":\"\",\"type\":\"connected\"}\n\n\
                    : keep-alive\n\n\
                    data:{\"role\":\"assistant\",\"content\":\"Hi\",\"type\":\"text\"}\n\n";
        let events = parse_sse_events(body);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Connected);
        assert_eq!(events[1].content, "Hi");
    }
}
