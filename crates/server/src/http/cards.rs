//! Card CRUD handlers.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use flowdeck_common::{Card, CardStatus, CreateCard, FlowdeckError, MoveCard, ReorderEntry, UpdateCard};
use serde::Serialize;
use serde_json::{json, Value};

use super::{ApiError, AppState};

/// List all active cards in a specific board, ordered by position.
pub async fn list_cards_by_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = state
        .store
        .table("cards")
        .select("*")
        .eq("board_id", &board_id)
        .eq("is_active", true)
        .order("position")
        .fetch()
        .await?;
    Ok(Json(cards))
}

/// List all active cards across all boards, ordered by priority.
pub async fn list_all_cards(State(state): State<AppState>) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = state
        .store
        .table("cards")
        .select("*")
        .eq("is_active", true)
        .order("priority")
        .fetch()
        .await?;
    Ok(Json(cards))
}

/// Create a new card.
pub async fn create_card(
    State(state): State<AppState>,
    Json(payload): Json<CreateCard>,
) -> Result<Json<Card>, ApiError> {
    #[derive(Serialize)]
    struct NewCardRow<'a> {
        #[serde(flatten)]
        card: &'a CreateCard,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    let now = Utc::now();
    let rows: Vec<Card> = state
        .store
        .table("cards")
        .insert(&NewCardRow {
            card: &payload,
            created_at: now,
            updated_at: now,
        })
        .await?;
    let card = rows
        .into_iter()
        .next()
        .ok_or_else(|| FlowdeckError::store("card insert returned no rows"))?;
    Ok(Json(card))
}

/// Get a specific card by ID.
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let cards: Vec<Card> = state
        .store
        .table("cards")
        .select("*")
        .eq("id", &card_id)
        .fetch()
        .await?;
    let card = cards
        .into_iter()
        .next()
        .ok_or(FlowdeckError::CardNotFound { card_id })?;
    Ok(Json(card))
}

/// Partially update a card. Unset fields are preserved.
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Json(payload): Json<UpdateCard>,
) -> Result<Json<Card>, ApiError> {
    #[derive(Serialize)]
    struct CardPatch<'a> {
        #[serde(flatten)]
        update: &'a UpdateCard,
        updated_at: DateTime<Utc>,
    }

    let rows: Vec<Card> = state
        .store
        .table("cards")
        .eq("id", &card_id)
        .update(&CardPatch {
            update: &payload,
            updated_at: Utc::now(),
        })
        .await?;
    let card = rows
        .into_iter()
        .next()
        .ok_or(FlowdeckError::CardNotFound { card_id })?;
    Ok(Json(card))
}

/// Soft delete a card.
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rows: Vec<Card> = state
        .store
        .table("cards")
        .eq("id", &card_id)
        .update(&json!({ "is_active": false, "updated_at": Utc::now() }))
        .await?;
    if rows.is_empty() {
        return Err(FlowdeckError::CardNotFound { card_id }.into());
    }
    Ok(Json(json!({ "message": "Card archived successfully" })))
}

/// Move a card to a different status/position/board.
pub async fn move_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Json(payload): Json<MoveCard>,
) -> Result<Json<Card>, ApiError> {
    #[derive(Serialize)]
    struct MovePatch<'a> {
        #[serde(flatten)]
        movement: &'a MoveCard,
        updated_at: DateTime<Utc>,
    }

    let rows: Vec<Card> = state
        .store
        .table("cards")
        .eq("id", &card_id)
        .update(&MovePatch {
            movement: &payload,
            updated_at: Utc::now(),
        })
        .await?;
    let card = rows
        .into_iter()
        .next()
        .ok_or(FlowdeckError::CardNotFound { card_id })?;
    Ok(Json(card))
}

/// Bulk update card positions (and optionally statuses).
pub async fn reorder_cards(
    State(state): State<AppState>,
    Json(entries): Json<Vec<ReorderEntry>>,
) -> Result<Json<Value>, ApiError> {
    #[derive(Serialize)]
    struct ReorderPatch {
        position: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<CardStatus>,
        updated_at: DateTime<Utc>,
    }

    let now = Utc::now();
    for entry in &entries {
        state
            .store
            .table("cards")
            .eq("id", &entry.id)
            .update::<Value>(&ReorderPatch {
                position: entry.position,
                status: entry.status,
                updated_at: now,
            })
            .await?;
    }
    Ok(Json(json!({ "message": "Cards reordered successfully" })))
}
