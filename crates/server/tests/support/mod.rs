//! Shared test support: mock upstream servers for the datastore and the
//! LLM gateway, spawned on random ports.
#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use flowdeck_server::ai::{AiService, OpenAiProvider};
use flowdeck_server::store::StoreClient;

// =============================================================================
// Mock datastore
// =============================================================================

/// One recorded request to a mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub table: String,
    pub query: String,
    pub body: Value,
}

#[derive(Default)]
struct StoreState {
    requests: Mutex<Vec<Recorded>>,
    /// Queued responses keyed by `"METHOD table"`, consumed in order.
    responses: Mutex<HashMap<String, Vec<(u16, Value)>>>,
}

/// Mock datastore speaking just enough of the table REST convention.
///
/// Unqueued requests answer `200 []`, which reads as "no matching rows".
pub struct MockStore {
    pub url: String,
    state: Arc<StoreState>,
}

impl MockStore {
    pub async fn spawn() -> Self {
        let state = Arc::new(StoreState::default());

        let app = Router::new()
            .route("/rest/v1/{table}", any(store_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Queue the next response for `METHOD` against `table`.
    pub fn respond(&self, method: &str, table: &str, status: u16, body: Value) {
        self.state
            .responses
            .lock()
            .unwrap()
            .entry(format!("{method} {table}"))
            .or_default()
            .push((status, body));
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests of one method against one table.
    pub fn requests_for(&self, method: &str, table: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.table == table)
            .collect()
    }
}

async fn store_handler(
    State(state): State<Arc<StoreState>>,
    Path(table): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> impl IntoResponse {
    let body_value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        table: table.clone(),
        query: query.unwrap_or_default(),
        body: body_value,
    });

    let queued = state
        .responses
        .lock()
        .unwrap()
        .get_mut(&format!("{method} {table}"))
        .and_then(|queue| {
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        });
    let (status, body) = queued.unwrap_or((200, json!([])));
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

// =============================================================================
// Mock LLM gateway
// =============================================================================

#[derive(Default)]
struct GatewayState {
    request_count: Mutex<usize>,
    responses: Mutex<Vec<(u16, Value)>>,
}

/// Mock chat-completion endpoint.
///
/// Responses are queued per test; an unqueued request fails loudly.
pub struct MockGateway {
    /// Full endpoint URL to hand to the provider.
    pub url: String,
    state: Arc<GatewayState>,
}

impl MockGateway {
    pub async fn spawn() -> Self {
        let state = Arc::new(GatewayState::default());

        let app = Router::new()
            .route("/v1/chat/completions", post(gateway_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            url: format!("http://{addr}/v1/chat/completions"),
            state,
        }
    }

    /// Queue a successful completion whose message content is `text`.
    pub fn respond_text(&self, text: &str) {
        self.state.responses.lock().unwrap().push((
            200,
            json!({
                "choices": [{ "message": { "content": text }, "finish_reason": "stop" }],
                "model": "gpt-4o-mini",
            }),
        ));
    }

    /// Queue a gateway-side failure.
    pub fn respond_error(&self, status: u16, message: &str) {
        self.state
            .responses
            .lock()
            .unwrap()
            .push((status, json!({ "error": { "message": message } })));
    }

    /// Number of completion calls seen so far.
    pub fn request_count(&self) -> usize {
        *self.state.request_count.lock().unwrap()
    }
}

async fn gateway_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    *state.request_count.lock().unwrap() += 1;
    let queued = {
        let mut responses = state.responses.lock().unwrap();
        if responses.is_empty() {
            None
        } else {
            Some(responses.remove(0))
        }
    };
    let (status, body) =
        queued.unwrap_or((500, json!({ "error": { "message": "no response queued" } })));
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

// =============================================================================
// Fixtures
// =============================================================================

/// Build the AI service against the two mocks.
pub fn ai_service(store: &MockStore, gateway: &MockGateway) -> AiService {
    let store_client = Arc::new(StoreClient::new(&store.url, "test-key").unwrap());
    let provider = Arc::new(OpenAiProvider::new("sk-test").with_base_url(gateway.url.clone()));
    AiService::new(store_client, provider, "gpt-4o-mini".to_string())
}

/// A card row as the store would return it.
pub fn card_row(id: &str, board_id: &str, title: &str, priority: i32) -> Value {
    json!({
        "id": id,
        "board_id": board_id,
        "title": title,
        "description": null,
        "status": "todo",
        "priority": priority,
        "priority_reason": null,
        "estimated_hours": null,
        "actual_hours": null,
        "deadline": null,
        "position": 0,
        "tags": [],
        "metadata": {},
        "is_active": true,
        "created_at": "2026-08-01T00:00:00Z",
        "updated_at": "2026-08-01T00:00:00Z",
    })
}

/// A board row as the store would return it.
pub fn board_row(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "color": "#6366f1",
        "position": 0,
        "is_active": true,
        "created_at": "2026-08-01T00:00:00Z",
        "updated_at": "2026-08-01T00:00:00Z",
    })
}
