//! Daily briefing prompt template.
//!
//! Summarizes the day's focus from the top slice of open cards plus the
//! locally computed high-priority and overdue counts.

use flowdeck_common::CardStatus;
use serde::Serialize;

use super::PromptTemplate;

/// Compact card snapshot for the briefing prompt.
#[derive(Debug, Clone, Serialize)]
pub struct BriefingDigest {
    pub title: String,
    pub board: String,
    pub priority: i32,
    pub deadline: Option<String>,
    pub status: CardStatus,
}

/// Context for the briefing prompt.
#[derive(Debug, Clone, Serialize)]
pub struct BriefingContext {
    /// Current date-time, `YYYY-MM-DD HH:MM`
    pub now: String,
    /// At most the top 20 cards by priority
    pub cards: Vec<BriefingDigest>,
    pub high_priority_count: usize,
    pub overdue_count: usize,
}

/// Get the briefing template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("daily-briefing", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Summarize the day's focus across open cards")
}

const SYSTEM_PROMPT: &str =
    "You are a productivity coach. Be concise and actionable. Output only valid JSON.";

const USER_PROMPT: &str = r#"Generate a brief daily briefing for these tasks.

Current date: {{now}}

Active tasks:
{{{json cards}}}

High priority count: {{high_priority_count}}
Overdue count: {{overdue_count}}

Provide:
1. A 2-3 sentence summary of the day's focus
2. Top 3 actionable suggestions for productivity

Respond with JSON:
{"summary": "...", "suggestions": ["...", "...", "..."]}"#;
