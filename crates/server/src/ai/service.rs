//! The AI operations: prompt assembly, one gateway call each, and
//! reconciliation of the parsed output back into the store.
//!
//! Every operation is a single linear pass over a loaded collection; no
//! state survives the request. Failure handling differs by operation and
//! the differences are deliberate: prioritization aborts on the first
//! store failure mid-loop, materializing extracted tasks skips failed
//! rows, and the daily briefing falls back to a locally computed summary.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use flowdeck_common::{
    Board, Card, CardStatus, CreateExtractedTasksResponse, DailyBriefing, ExtractTasksResponse,
    ExtractedTask, FlowdeckError, FlowdeckResult, HighPriorityRef, OverdueRef, PrioritizeResponse,
    PriorityAssignment, SuggestResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::prompts::briefing::{BriefingContext, BriefingDigest};
use super::prompts::extract::ExtractContext;
use super::prompts::prioritize::{CardDigest, PrioritizeContext};
use super::prompts::suggest::SuggestContext;
use super::prompts::{briefing, extract, prioritize, suggest};
use super::provider::{ChatMessage, ChatProvider, GenerateOptions};
use super::response::{parse_payload, validate_assignments, BriefingPayload};
use crate::store::StoreClient;

/// Fallback suggestions when the briefing model call fails.
const FALLBACK_SUGGESTIONS: [&str; 2] = [
    "Review your high-priority tasks first",
    "Check for any overdue items",
];

/// Cards included in the briefing prompt, by priority order.
const BRIEFING_PROMPT_LIMIT: usize = 20;

/// Cards listed in the briefing's high-priority section.
const BRIEFING_HIGH_PRIORITY_LIMIT: usize = 5;

/// The AI operations over the store and one chat provider.
pub struct AiService {
    store: Arc<StoreClient>,
    provider: Arc<dyn ChatProvider>,
    model: String,
}

impl AiService {
    /// Create the service. Handles are constructed once at startup and
    /// shared across requests.
    pub fn new(store: Arc<StoreClient>, provider: Arc<dyn ChatProvider>, model: String) -> Self {
        Self {
            store,
            provider,
            model,
        }
    }

    async fn complete(
        &self,
        system: String,
        user: String,
        options: GenerateOptions,
    ) -> FlowdeckResult<String> {
        let completion = self
            .provider
            .complete(
                &self.model,
                &[ChatMessage::system(system), ChatMessage::user(user)],
                &options,
            )
            .await?;
        Ok(completion.text)
    }

    /// Re-rank card priorities, optionally restricted to one board.
    ///
    /// Zero matching cards is a no-op that never reaches the gateway.
    pub async fn prioritize(&self, board_id: Option<&str>) -> FlowdeckResult<PrioritizeResponse> {
        let mut request = self.store.table("cards").select("*");
        if let Some(board_id) = board_id {
            request = request.eq("board_id", board_id);
        }
        let cards: Vec<Card> = request.fetch().await?;

        if cards.is_empty() {
            info!("no cards to prioritize");
            return Ok(PrioritizeResponse {
                cards_updated: 0,
                priorities: Vec::new(),
            });
        }

        let boards: Vec<Board> = self.store.table("boards").select("*").fetch().await?;
        let board_names: HashMap<&str, &str> = boards
            .iter()
            .map(|b| (b.id.as_str(), b.name.as_str()))
            .collect();

        let digests: Vec<CardDigest> = cards
            .iter()
            .map(|card| CardDigest {
                id: card.id.clone(),
                title: card.title.clone(),
                description: card.description.clone().unwrap_or_default(),
                board: board_names
                    .get(card.board_id.as_str())
                    .map_or_else(|| "Unknown".to_string(), ToString::to_string),
                status: card.status,
                current_priority: card.priority,
                deadline: card.deadline.map(|d| d.to_rfc3339()),
                estimated_hours: card.estimated_hours,
                tags: card.tags.clone(),
                created_at: card.created_at.to_rfc3339(),
            })
            .collect();

        let context = PrioritizeContext {
            now: Utc::now().to_rfc3339(),
            cards: digests,
        };
        let (system, user) = prioritize::template().render(&context)?;
        let text = self
            .complete(
                system,
                user,
                GenerateOptions {
                    temperature: Some(0.3),
                    max_tokens: Some(2000),
                },
            )
            .await?;

        let assignments: Vec<PriorityAssignment> = parse_payload(&text)?;
        validate_assignments(&assignments)?;

        let applied_at = Utc::now();
        for assignment in &assignments {
            // Previous priority comes from the set loaded above, not a
            // fresh read; ids the model invented default to 3 and their
            // update matches zero rows.
            let old_priority = cards
                .iter()
                .find(|c| c.id == assignment.id)
                .map_or(3, |c| c.priority);

            if old_priority != assignment.priority {
                #[derive(Serialize)]
                struct NewHistoryRow<'a> {
                    card_id: &'a str,
                    old_priority: i32,
                    new_priority: i32,
                    reasoning: &'a str,
                    model_used: &'a str,
                    timestamp: DateTime<Utc>,
                }

                self.store
                    .table("priority_history")
                    .insert::<serde_json::Value>(&NewHistoryRow {
                        card_id: &assignment.id,
                        old_priority,
                        new_priority: assignment.priority,
                        reasoning: &assignment.reasoning,
                        model_used: &self.model,
                        timestamp: applied_at,
                    })
                    .await?;
            }

            #[derive(Serialize)]
            struct PriorityPatch<'a> {
                priority: i32,
                priority_reason: &'a str,
                updated_at: DateTime<Utc>,
            }

            self.store
                .table("cards")
                .eq("id", &assignment.id)
                .update::<serde_json::Value>(&PriorityPatch {
                    priority: assignment.priority,
                    priority_reason: &assignment.reasoning,
                    updated_at: applied_at,
                })
                .await?;
        }

        info!(cards_updated = assignments.len(), "prioritization pass applied");
        Ok(PrioritizeResponse {
            cards_updated: assignments.len(),
            priorities: assignments,
        })
    }

    /// Suggest next actions for one card. No persistence.
    pub async fn suggest(&self, card_id: &str) -> FlowdeckResult<SuggestResponse> {
        let cards: Vec<Card> = self
            .store
            .table("cards")
            .select("*")
            .eq("id", card_id)
            .fetch()
            .await?;
        let Some(card) = cards.into_iter().next() else {
            return Err(FlowdeckError::CardNotFound {
                card_id: card_id.to_string(),
            });
        };

        let context = SuggestContext {
            title: card.title.clone(),
            description: card
                .description
                .clone()
                .unwrap_or_else(|| "No description".to_string()),
            status: card.status.to_string(),
            priority: card.priority,
            deadline: card
                .deadline
                .map_or_else(|| "No deadline".to_string(), |d| d.to_rfc3339()),
            estimated_hours: card
                .estimated_hours
                .map_or_else(|| "Not estimated".to_string(), |h| h.to_string()),
            tags: card.tags.join(", "),
        };
        let (system, user) = suggest::template().render(&context)?;
        let text = self
            .complete(
                system,
                user,
                GenerateOptions {
                    temperature: Some(0.5),
                    max_tokens: Some(500),
                },
            )
            .await?;

        parse_payload(&text)
    }

    /// Build the daily briefing. The model call is best-effort: any
    /// gateway or parse failure degrades to the local fallback summary.
    pub async fn daily_briefing(&self) -> FlowdeckResult<DailyBriefing> {
        let now = Utc::now();
        let rows: Vec<BriefingRow> = self
            .store
            .table("cards")
            .select("*, boards(name)")
            .neq("status", "done")
            .order("priority")
            .fetch()
            .await?;

        let high_priority: Vec<&BriefingRow> =
            rows.iter().filter(|r| r.priority.unwrap_or(3) <= 2).collect();
        let overdue: Vec<&BriefingRow> = rows
            .iter()
            .filter(|r| is_overdue(r.deadline.as_deref(), now))
            .collect();

        let context = BriefingContext {
            now: now.format("%Y-%m-%d %H:%M").to_string(),
            cards: rows
                .iter()
                .take(BRIEFING_PROMPT_LIMIT)
                .map(|r| BriefingDigest {
                    title: r.title.clone(),
                    board: r
                        .boards
                        .as_ref()
                        .map_or_else(|| "Unknown".to_string(), |b| b.name.clone()),
                    priority: r.priority.unwrap_or(3),
                    deadline: r.deadline.clone(),
                    status: r.status,
                })
                .collect(),
            high_priority_count: high_priority.len(),
            overdue_count: overdue.len(),
        };

        let payload = match self.briefing_completion(&context).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "briefing model call failed, using local fallback");
                BriefingPayload {
                    summary: format!(
                        "You have {} high-priority tasks and {} overdue items.",
                        high_priority.len(),
                        overdue.len()
                    ),
                    suggestions: FALLBACK_SUGGESTIONS.iter().map(ToString::to_string).collect(),
                }
            }
        };

        Ok(DailyBriefing {
            date: now.format("%Y-%m-%d").to_string(),
            high_priority_tasks: high_priority
                .iter()
                .take(BRIEFING_HIGH_PRIORITY_LIMIT)
                .map(|r| HighPriorityRef {
                    id: r.id.clone(),
                    title: r.title.clone(),
                    priority: r.priority.unwrap_or(3),
                })
                .collect(),
            overdue_tasks: overdue
                .iter()
                .map(|r| OverdueRef {
                    id: r.id.clone(),
                    title: r.title.clone(),
                    deadline: r.deadline.clone(),
                })
                .collect(),
            suggestions: payload.suggestions,
            summary: payload.summary,
        })
    }

    async fn briefing_completion(&self, context: &BriefingContext) -> FlowdeckResult<BriefingPayload> {
        let (system, user) = briefing::template().render(context)?;
        let text = self
            .complete(
                system,
                user,
                GenerateOptions {
                    temperature: Some(0.5),
                    max_tokens: Some(500),
                },
            )
            .await?;
        parse_payload(&text)
    }

    /// Extract structured tasks from free text. Nothing is persisted —
    /// the tasks go back to the client for review.
    pub async fn extract_tasks(
        &self,
        text: &str,
        board_id: &str,
    ) -> FlowdeckResult<ExtractTasksResponse> {
        #[derive(Deserialize)]
        struct BoardName {
            name: String,
        }

        let boards: Vec<BoardName> = self
            .store
            .table("boards")
            .select("name")
            .eq("id", board_id)
            .fetch()
            .await?;
        let board_name = boards
            .into_iter()
            .next()
            .map_or_else(|| "Unknown".to_string(), |b| b.name);

        let context = ExtractContext {
            today: Utc::now().format("%Y-%m-%d").to_string(),
            board_name,
            text: text.to_string(),
        };
        let (system, user) = extract::template().render(&context)?;
        let output = self
            .complete(
                system,
                user,
                GenerateOptions {
                    temperature: Some(0.3),
                    max_tokens: Some(2000),
                },
            )
            .await?;

        let mut payload: ExtractTasksResponse = parse_payload(&output)?;
        for task in &mut payload.tasks {
            task.board_id = Some(board_id.to_string());
            task.status = "todo".to_string();
            task.position = 0;
        }
        Ok(payload)
    }

    /// Materialize reviewed extracted tasks as cards. A failed insert is
    /// logged and its entry omitted; the batch itself never fails.
    pub async fn create_extracted(
        &self,
        tasks: &[ExtractedTask],
    ) -> FlowdeckResult<CreateExtractedTasksResponse> {
        #[derive(Serialize)]
        struct NewCardRow<'a> {
            board_id: Option<&'a str>,
            title: &'a str,
            description: Option<&'a str>,
            status: &'a str,
            priority: i32,
            estimated_hours: Option<f64>,
            deadline: Option<&'a str>,
            position: i32,
            tags: &'a [String],
            metadata: serde_json::Value,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let now = Utc::now();
        let mut created: Vec<Card> = Vec::new();
        for task in tasks {
            let row = NewCardRow {
                board_id: task.board_id.as_deref(),
                title: &task.title,
                description: task.description.as_deref(),
                status: &task.status,
                priority: task.priority,
                estimated_hours: task.estimated_hours,
                deadline: task.deadline.as_deref(),
                position: task.position,
                tags: &task.tags,
                metadata: serde_json::json!({ "source": "ai_extraction" }),
                created_at: now,
                updated_at: now,
            };
            match self.store.table("cards").insert::<Card>(&row).await {
                Ok(rows) => created.extend(rows.into_iter().next()),
                Err(err) => {
                    warn!(title = %task.title, error = %err, "skipping extracted task that failed to insert");
                }
            }
        }

        info!(created_count = created.len(), "extracted tasks materialized");
        Ok(CreateExtractedTasksResponse {
            created_count: created.len(),
            cards: created,
        })
    }
}

/// Row shape for the briefing query, with the board name embedded.
///
/// The deadline is kept as raw text here: rows with a deadline the store
/// returns in a shape we cannot parse are excluded from the overdue set
/// rather than failing the briefing.
#[derive(Debug, Clone, Deserialize)]
struct BriefingRow {
    id: String,
    title: String,
    #[serde(default)]
    priority: Option<i32>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    status: CardStatus,
    #[serde(default)]
    boards: Option<EmbeddedBoard>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddedBoard {
    name: String,
}

/// Whether a raw deadline lies strictly in the past.
///
/// Deadlines that are absent, unparsable, or missing a UTC offset do not
/// compare meaningfully and are never overdue.
fn is_overdue(deadline: Option<&str>, now: DateTime<Utc>) -> bool {
    let Some(raw) = deadline else {
        return false;
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc) < now)
        .unwrap_or(false)
}
