//! Board CRUD handlers.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use flowdeck_common::{Board, CreateBoard, FlowdeckError, UpdateBoard};
use serde::Serialize;
use serde_json::{json, Value};

use super::{ApiError, AppState};

/// List all active boards ordered by position.
pub async fn list_boards(State(state): State<AppState>) -> Result<Json<Vec<Board>>, ApiError> {
    let boards = state
        .store
        .table("boards")
        .select("*")
        .eq("is_active", true)
        .order("position")
        .fetch()
        .await?;
    Ok(Json(boards))
}

/// List all archived (soft-deleted) boards.
pub async fn list_archived_boards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Board>>, ApiError> {
    let boards = state
        .store
        .table("boards")
        .select("*")
        .eq("is_active", false)
        .order("position")
        .fetch()
        .await?;
    Ok(Json(boards))
}

/// Create a new board.
pub async fn create_board(
    State(state): State<AppState>,
    Json(payload): Json<CreateBoard>,
) -> Result<Json<Board>, ApiError> {
    #[derive(Serialize)]
    struct NewBoardRow<'a> {
        #[serde(flatten)]
        board: &'a CreateBoard,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    let now = Utc::now();
    let rows: Vec<Board> = state
        .store
        .table("boards")
        .insert(&NewBoardRow {
            board: &payload,
            created_at: now,
            updated_at: now,
        })
        .await?;
    let board = rows
        .into_iter()
        .next()
        .ok_or_else(|| FlowdeckError::store("board insert returned no rows"))?;
    Ok(Json(board))
}

/// Get a specific board by ID.
pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<Json<Board>, ApiError> {
    let boards: Vec<Board> = state
        .store
        .table("boards")
        .select("*")
        .eq("id", &board_id)
        .fetch()
        .await?;
    let board = boards
        .into_iter()
        .next()
        .ok_or(FlowdeckError::BoardNotFound { board_id })?;
    Ok(Json(board))
}

/// Partially update a board. Unset fields are preserved.
pub async fn update_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(payload): Json<UpdateBoard>,
) -> Result<Json<Board>, ApiError> {
    #[derive(Serialize)]
    struct BoardPatch<'a> {
        #[serde(flatten)]
        update: &'a UpdateBoard,
        updated_at: DateTime<Utc>,
    }

    let rows: Vec<Board> = state
        .store
        .table("boards")
        .eq("id", &board_id)
        .update(&BoardPatch {
            update: &payload,
            updated_at: Utc::now(),
        })
        .await?;
    let board = rows
        .into_iter()
        .next()
        .ok_or(FlowdeckError::BoardNotFound { board_id })?;
    Ok(Json(board))
}

/// Soft delete a board and all its cards.
///
/// Two independent writes, cards first; there is no transaction around
/// the cascade.
pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let now = Utc::now();
    let deactivate = json!({ "is_active": false, "updated_at": now });

    state
        .store
        .table("cards")
        .eq("board_id", &board_id)
        .update::<Value>(&deactivate)
        .await?;
    let boards: Vec<Board> = state
        .store
        .table("boards")
        .eq("id", &board_id)
        .update(&deactivate)
        .await?;
    if boards.is_empty() {
        return Err(FlowdeckError::BoardNotFound { board_id }.into());
    }
    Ok(Json(json!({ "message": "Board archived successfully" })))
}

/// Restore a soft-deleted board and all its cards.
pub async fn restore_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<Json<Board>, ApiError> {
    let now = Utc::now();
    let activate = json!({ "is_active": true, "updated_at": now });

    state
        .store
        .table("cards")
        .eq("board_id", &board_id)
        .update::<Value>(&activate)
        .await?;
    let boards: Vec<Board> = state
        .store
        .table("boards")
        .eq("id", &board_id)
        .update(&activate)
        .await?;
    let board = boards
        .into_iter()
        .next()
        .ok_or(FlowdeckError::BoardNotFound { board_id })?;
    Ok(Json(board))
}
