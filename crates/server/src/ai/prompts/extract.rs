//! Task extraction prompt template.
//!
//! Pulls actionable items out of pasted free text, resolving relative
//! deadlines against the current date.

use serde::Serialize;

use super::PromptTemplate;

/// Context for the extract prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractContext {
    /// Current date, `YYYY-MM-DD`
    pub today: String,
    /// Name of the target board, for context
    pub board_name: String,
    /// Raw text to analyze
    pub text: String,
}

/// Get the extract template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("extract-tasks", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Extract actionable tasks from pasted free text")
}

const SYSTEM_PROMPT: &str =
    "You are an expert at extracting tasks from unstructured text. Output only valid JSON.";

const USER_PROMPT: &str = r#"You are a task extraction assistant. Extract actionable tasks from the following text.

Current date: {{today}}
Board/Context: {{board_name}}

Text to analyze:
"""
{{text}}
"""

For each task found, extract:
1. title: Clear, concise task title (max 100 chars)
2. description: Additional details if available
3. deadline: ISO date string if mentioned (interpret "next Tuesday", "Dec 15", etc.), null if not mentioned
4. priority: 1-5 based on urgency words (urgent=1, important=2, normal=3, low=4, minimal=5)
5. estimated_hours: Rough estimate based on complexity, null if unclear
6. tags: Relevant tags extracted from context (e.g., "essay", "reading", "meeting", "research")

Respond with JSON:
{
  "tasks": [
    {
      "title": "Task title",
      "description": "Details or null",
      "deadline": "2026-12-15T23:59:00Z or null",
      "priority": 3,
      "estimated_hours": 2.0 or null,
      "tags": ["tag1", "tag2"]
    }
  ],
  "summary": "Brief summary of what was extracted"
}

Extract ALL actionable items. Be thorough but avoid duplicates. Output only valid JSON."#;
