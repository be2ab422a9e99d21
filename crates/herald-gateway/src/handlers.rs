// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route handlers: `POST /chat`, `GET /healthz`, `GET /privacy`.

use std::collections::BTreeMap;
use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, Sse};
use chrono::{DateTime, Utc};
use futures::stream::{Stream, StreamExt};
use herald_core::{ChatRequest, ProtocolEvent};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, error, warn};

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub build_sha: String,
    pub pack_checksums: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyResponse {
    pub title: &'static str,
    pub content: String,
    pub last_updated: String,
}

/// POST /chat
///
/// Runs the pre-stream phase inline so a malformed request or a failed
/// classification is answered with a JSON error. Once that passes, the
/// response is an event stream fed by a spawned orchestrator task. Dropping
/// the response drops the receiver, which stops the task at its next write.
pub async fn post_chat(
    State(state): State<GatewayState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "failed to decode chat request");
        ApiError::bad_request("Invalid JSON")
    })?;

    let prepared = state.orchestrator.prepare(request).await?;

    let (tx, rx) = mpsc::channel(state.event_buffer);
    let orchestrator = state.orchestrator.clone();
    tokio::spawn(
        async move {
            orchestrator.respond(prepared, tx).await;
        }
        .in_current_span(),
    );

    Ok(Sse::new(ReceiverStream::new(rx).filter_map(
        |event| async move { encode(&event).map(Ok) },
    )))
}

fn encode(event: &ProtocolEvent) -> Option<Event> {
    match event.to_json() {
        Ok(json) => Some(Event::default().data(json)),
        Err(e) => {
            error!(error = %e, kind = %event.kind, "dropping unencodable event");
            None
        }
    }
}

/// GET /healthz
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        build_sha: state.build_sha.to_string(),
        pack_checksums: state.content.checksums(),
        timestamp: Utc::now(),
    })
}

/// GET /privacy
pub async fn get_privacy(State(state): State<GatewayState>) -> Json<PrivacyResponse> {
    let today = Utc::now().date_naive();
    Json(PrivacyResponse {
        title: "Privacy Notice",
        content: privacy_notice(&state.contact_email, &today.format("%B %-d, %Y").to_string()),
        last_updated: today.format("%Y-%m-%d").to_string(),
    })
}

fn privacy_notice(contact_email: &str, updated: &str) -> String {
    format!(
        "# Privacy Notice

## Data Collection
- We log IP addresses for security and rate limiting purposes
- Chat messages are processed by AI services but are not stored persistently
- No cookies or persistent tracking mechanisms are used
- No personal information is retained beyond temporary processing

## Data Processing
- Your messages are sent to Google's Gemini AI service for processing
- Meeting scheduling requests result in providing a Calendly link for direct booking
- All data processing follows the principle of minimal data collection

## Data Retention
- Access logs are retained for up to 30 days for security purposes
- Chat conversations are not stored after processing
- Meeting scheduling is handled entirely through Calendly (no data stored by this service)

## Your Rights
- You can request deletion of any logged data by contacting us
- You have the right to know what data we process
- You can opt out of using this service at any time

## Third-Party Services
This service integrates with:
- Google Gemini AI (for chat processing)
- Calendly (for meeting scheduling links)

Please review their respective privacy policies for how they handle data.

## Contact
For privacy-related inquiries or data deletion requests, contact: {contact_email}

Last updated: {updated}"
    )
}
