//! Card suggestion prompt template.
//!
//! Asks for 2-4 actionable suggestions plus a short overall assessment
//! of a single card.

use serde::Serialize;

use super::PromptTemplate;

/// Context for the suggest prompt. Fields are pre-formatted for display,
/// with placeholders for anything the card does not carry.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestContext {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: i32,
    pub deadline: String,
    pub estimated_hours: String,
    pub tags: String,
}

/// Get the suggest template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("suggest", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Actionable suggestions for completing a single card")
}

const SYSTEM_PROMPT: &str = "You are a productivity assistant. Output only valid JSON.";

const USER_PROMPT: &str = r#"Analyze this task and provide actionable suggestions:

Task: {{title}}
Description: {{description}}
Status: {{status}}
Priority: {{priority}}/5
Deadline: {{deadline}}
Estimated hours: {{estimated_hours}}
Tags: {{tags}}

Provide 2-4 brief, actionable suggestions to help complete this task effectively.
Consider: breaking down the task, time management, potential blockers, and prioritization.

Respond with JSON:
{"suggestions": ["suggestion 1", "suggestion 2"], "reasoning": "Brief overall assessment"}"#;
