// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt and per-intent context assembly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::America::Los_Angeles;
use herald_config::model::SubjectConfig;
use herald_core::{ContentDocument, IntentKind};

/// Heading placed before reference documents in the system context.
pub const CONTEXT_HEADING: &str = "Context about Jai:";

/// Renders the representative persona prompt.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    subject: SubjectConfig,
}

impl PromptBuilder {
    pub fn new(subject: SubjectConfig) -> Self {
        Self { subject }
    }

    /// The persona prompt as of `now`, with the clock shown in Pacific Time.
    pub fn system_prompt(&self, now: DateTime<Utc>) -> String {
        let SubjectConfig { email, linkedin, x } = &self.subject;
        format!(
            "You are Jai's internet representative. Always speak in third person about Jai.\n\
             \n\
             Current date and time: {now} (Pacific Time)\n\
             \n\
             Your capabilities:\n\
             1. Answer questions about Jai using the provided context\n\
             2. Help schedule meetings with Jai using his Calendly link\n\
             3. Provide contact information (email: {email}, LinkedIn: {linkedin}, X: {x})\n\
             \n\
             For meeting scheduling:\n\
             - When someone wants to schedule a meeting, use the scheduleCalendlyMeeting tool\n\
             - The tool will provide Jai's Calendly link for easy 30-minute meeting booking\n\
             - Always mention that meetings are in Pacific Time\n\
             - Be helpful and professional when directing people to use Calendly\n\
             \n\
             Keep responses professional and helpful. Always refer to Jai in third person.",
            now = now
                .with_timezone(&Los_Angeles)
                .format("%A, %B %-d, %Y at %-I:%M %p %Z"),
        )
    }

    /// Builds the system context for one turn.
    ///
    /// `qa_about_jai` gets every document appended verbatim after
    /// [`CONTEXT_HEADING`]; other intents get the persona prompt alone.
    pub fn assemble(
        &self,
        intent: IntentKind,
        documents: &[Arc<ContentDocument>],
        now: DateTime<Utc>,
    ) -> String {
        let mut context = self.system_prompt(now);
        if intent == IntentKind::QaAboutJai && !documents.is_empty() {
            context.push_str("\n\n");
            context.push_str(CONTEXT_HEADING);
            context.push('\n');
            for document in documents {
                context.push_str(&document.content);
                context.push('\n');
            }
        }
        context
    }
}
