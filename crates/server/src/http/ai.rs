//! Handlers for the AI operations.

use axum::extract::State;
use axum::Json;
use flowdeck_common::{
    CreateExtractedTasksRequest, CreateExtractedTasksResponse, DailyBriefing, ExtractTasksRequest,
    ExtractTasksResponse, PrioritizeRequest, PrioritizeResponse, SuggestRequest, SuggestResponse,
};

use super::{ApiError, AppState};

/// Trigger AI prioritization for cards.
pub async fn prioritize(
    State(state): State<AppState>,
    Json(request): Json<PrioritizeRequest>,
) -> Result<Json<PrioritizeResponse>, ApiError> {
    let response = state.ai.prioritize(request.board_id.as_deref()).await?;
    Ok(Json(response))
}

/// Get AI suggestions for a specific card.
pub async fn suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let response = state.ai.suggest(&request.card_id).await?;
    Ok(Json(response))
}

/// Generate the AI-assisted daily briefing.
pub async fn daily_briefing(
    State(state): State<AppState>,
) -> Result<Json<DailyBriefing>, ApiError> {
    let briefing = state.ai.daily_briefing().await?;
    Ok(Json(briefing))
}

/// Extract tasks from pasted text.
pub async fn extract_tasks(
    State(state): State<AppState>,
    Json(request): Json<ExtractTasksRequest>,
) -> Result<Json<ExtractTasksResponse>, ApiError> {
    let response = state
        .ai
        .extract_tasks(&request.text, &request.board_id)
        .await?;
    Ok(Json(response))
}

/// Create cards from previously extracted tasks.
pub async fn create_extracted_tasks(
    State(state): State<AppState>,
    Json(request): Json<CreateExtractedTasksRequest>,
) -> Result<Json<CreateExtractedTasksResponse>, ApiError> {
    let response = state.ai.create_extracted(&request.tasks).await?;
    Ok(Json(response))
}
