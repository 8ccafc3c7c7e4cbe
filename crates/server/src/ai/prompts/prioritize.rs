//! Card prioritization prompt template.
//!
//! Ranks every card 1 (highest) to 5, weighing deadline proximity first.

use flowdeck_common::CardStatus;
use serde::Serialize;

use super::PromptTemplate;

/// Snapshot of one card as shown to the model.
#[derive(Debug, Clone, Serialize)]
pub struct CardDigest {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Resolved board name for display context
    pub board: String,
    pub status: CardStatus,
    pub current_priority: i32,
    pub deadline: Option<String>,
    pub estimated_hours: Option<f64>,
    pub tags: Vec<String>,
    pub created_at: String,
}

/// Context for the prioritize prompt.
#[derive(Debug, Clone, Serialize)]
pub struct PrioritizeContext {
    /// Current wall-clock instant, ISO-8601
    pub now: String,
    /// Cards to rank
    pub cards: Vec<CardDigest>,
}

/// Get the prioritize template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("prioritize", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Rank card priorities from deadlines, estimates, and age")
}

const SYSTEM_PROMPT: &str = "You are a task prioritization expert. Output only valid JSON.";

const USER_PROMPT: &str = r#"You are a task prioritization assistant. Analyze these tasks and assign priority levels (1-5, where 1 is highest priority).

Current date: {{now}}

Consider these factors:
1. Deadline proximity (highest weight)
2. Task complexity and estimated time
3. Dependencies and blocking tasks
4. Current status (in_progress tasks may need attention)
5. Task age (older tasks might be neglected)

Tasks to prioritize:
{{{json cards}}}

Respond with a JSON array of objects with this exact structure:
[
  {"id": "card-id", "priority": 1-5, "reasoning": "Brief explanation"}
]

Only output the JSON array, no other text."#;
