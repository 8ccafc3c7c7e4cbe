//! Domain entity and API type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Todo,
    InProgress,
    Done,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_priority() -> i32 {
    3
}

fn default_board_color() -> Option<String> {
    Some("#6366f1".to_string())
}

fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A kanban board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Unique identifier (store-assigned)
    pub id: String,
    /// Board name
    pub name: String,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Display color (hex)
    #[serde(default = "default_board_color")]
    pub color: Option<String>,
    /// Ordering position among boards
    #[serde(default)]
    pub position: i32,
    /// Soft-delete flag; archived boards keep their rows
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Created timestamp (server-assigned)
    pub created_at: DateTime<Utc>,
    /// Updated timestamp (server-assigned)
    pub updated_at: DateTime<Utc>,
}

/// A card on a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier (store-assigned)
    pub id: String,
    /// Owning board
    pub board_id: String,
    /// Card title
    pub title: String,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow status
    #[serde(default)]
    pub status: CardStatus,
    /// Priority 1-5, 1 is highest
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// AI-supplied reasoning for the current priority
    #[serde(default)]
    pub priority_reason: Option<String>,
    /// Estimated effort in hours
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Actual effort in hours
    #[serde(default)]
    pub actual_hours: Option<f64>,
    /// Optional deadline
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Ordering position within its column
    #[serde(default)]
    pub position: i32,
    /// Ordered tag set
    #[serde(default)]
    pub tags: Vec<String>,
    /// Open-ended metadata mapping
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
    /// Soft-delete flag; follows the owning board on archive/restore
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Created timestamp (server-assigned)
    pub created_at: DateTime<Utc>,
    /// Updated timestamp (server-assigned)
    pub updated_at: DateTime<Utc>,
}

/// Audit record for an AI-driven priority change. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityHistory {
    /// Unique identifier (store-assigned)
    pub id: String,
    /// Card whose priority changed
    pub card_id: String,
    /// Priority before the change; absent on first assignment
    #[serde(default)]
    pub old_priority: Option<i32>,
    /// Priority after the change
    pub new_priority: i32,
    /// Model-supplied reasoning for the change
    pub reasoning: String,
    /// Identifier of the model that produced the reasoning
    pub model_used: String,
    /// When the change was applied
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Board requests
// =============================================================================

/// Request body for creating a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_board_color")]
    pub color: Option<String>,
    #[serde(default)]
    pub position: i32,
}

/// Partial update for a board. Unset fields are preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

// =============================================================================
// Card requests
// =============================================================================

/// Request body for creating a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCard {
    pub board_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub priority_reason: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
}

/// Partial update for a card. Unset fields are preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
}

/// Request body for moving a card to a different status/position/board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: String,
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
}

// =============================================================================
// AI requests and responses
// =============================================================================

/// Request body for AI prioritization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrioritizeRequest {
    /// Restrict the pass to one board; all boards when absent
    #[serde(default)]
    pub board_id: Option<String>,
}

/// One priority assignment produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityAssignment {
    pub id: String,
    pub priority: i32,
    pub reasoning: String,
}

/// Result of a prioritization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizeResponse {
    pub cards_updated: usize,
    pub priorities: Vec<PriorityAssignment>,
}

/// Request body for card suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub card_id: String,
}

/// AI suggestions for a single card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
    pub reasoning: String,
}

/// Compact card reference in the daily briefing's high-priority list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighPriorityRef {
    pub id: String,
    pub title: String,
    pub priority: i32,
}

/// Compact card reference in the daily briefing's overdue list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverdueRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// AI-assisted daily briefing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBriefing {
    /// Briefing date, `YYYY-MM-DD`
    pub date: String,
    /// Up to five cards with priority 2 or higher
    pub high_priority_tasks: Vec<HighPriorityRef>,
    /// Cards whose deadline lies in the past
    pub overdue_tasks: Vec<OverdueRef>,
    pub suggestions: Vec<String>,
    pub summary: String,
}

fn default_todo() -> String {
    "todo".to_string()
}

/// A task extracted from free text. Transient until materialized as a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Deadline as produced by the model; ISO or left as written
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Target board, stamped by the extraction operation
    #[serde(default)]
    pub board_id: Option<String>,
    #[serde(default = "default_todo")]
    pub status: String,
    #[serde(default)]
    pub position: i32,
}

/// Request body for task extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractTasksRequest {
    pub text: String,
    pub board_id: String,
}

/// Extracted tasks awaiting client review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractTasksResponse {
    pub tasks: Vec<ExtractedTask>,
    pub summary: String,
}

/// Request body for materializing reviewed extracted tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExtractedTasksRequest {
    pub tasks: Vec<ExtractedTask>,
}

/// Result of materializing extracted tasks as cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExtractedTasksResponse {
    pub created_count: usize,
    pub cards: Vec<Card>,
}
