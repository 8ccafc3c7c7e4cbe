//! HTTP surface for the Flowdeck backend.
//!
//! Thin handlers over the store client and the AI service: decode the
//! request, delegate, map the error taxonomy onto status codes. All
//! domain routes live under `/api`.

mod ai;
mod boards;
mod cards;
mod settings;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::routing::post;
use axum::{Json, Router};
use flowdeck_common::FlowdeckError;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::ai::AiService;
use crate::config::Config;
use crate::store::StoreClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Config,
    /// Store client, constructed once at startup.
    pub store: Arc<StoreClient>,
    /// AI operations.
    pub ai: Arc<AiService>,
}

/// Error wrapper mapping the domain taxonomy onto HTTP responses.
///
/// Not-found surfaces as 404 with its fixed message; everything else is
/// a generic 500 carrying the error message.
pub struct ApiError(FlowdeckError);

impl From<FlowdeckError> for ApiError {
    fn from(err: FlowdeckError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FlowdeckError::BoardNotFound { .. } | FlowdeckError::CardNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    // Permissive CORS: the desktop frontend connects from an arbitrary origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Boards
        .route(
            "/api/boards",
            get(boards::list_boards).post(boards::create_board),
        )
        .route("/api/boards/archived", get(boards::list_archived_boards))
        .route(
            "/api/boards/{board_id}",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/api/boards/{board_id}/restore", post(boards::restore_board))
        // Cards
        .route(
            "/api/cards",
            get(cards::list_all_cards).post(cards::create_card),
        )
        .route("/api/cards/board/{board_id}", get(cards::list_cards_by_board))
        .route("/api/cards/reorder", post(cards::reorder_cards))
        .route(
            "/api/cards/{card_id}",
            get(cards::get_card)
                .put(cards::update_card)
                .delete(cards::delete_card),
        )
        .route("/api/cards/{card_id}/move", post(cards::move_card))
        // AI operations
        .route("/api/ai/prioritize", post(ai::prioritize))
        .route("/api/ai/suggest", post(ai::suggest))
        .route("/api/ai/daily-briefing", get(ai::daily_briefing))
        .route("/api/ai/extract-tasks", post(ai::extract_tasks))
        .route(
            "/api/ai/create-extracted-tasks",
            post(ai::create_extracted_tasks),
        )
        // Settings
        .route(
            "/api/settings",
            get(settings::get_settings).post(settings::save_settings),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn root_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Flowdeck API",
        "version": env!("CARGO_PKG_VERSION"),
        "port": state.config.port,
    }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}
