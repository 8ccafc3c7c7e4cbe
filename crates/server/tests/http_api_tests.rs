//! End-to-end tests for the HTTP surface, with the real router wired to
//! mock upstream servers.

mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use flowdeck_server::ai::{AiService, OpenAiProvider};
use flowdeck_server::config::Config;
use flowdeck_server::http::{build_router, AppState};
use flowdeck_server::store::StoreClient;
use support::{board_row, card_row, MockGateway, MockStore};

/// Spawn the real server against the mocks; returns its base URL.
async fn spawn_app(store: &MockStore, gateway: &MockGateway) -> String {
    let store_client = Arc::new(StoreClient::new(&store.url, "test-key").unwrap());
    let provider = Arc::new(OpenAiProvider::new("sk-test").with_base_url(gateway.url.clone()));
    let ai = Arc::new(AiService::new(
        store_client.clone(),
        provider,
        "gpt-4o-mini".to_string(),
    ));

    let state = AppState {
        config: Config::default(),
        store: store_client,
        ai,
    };
    let app = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://{addr}")
}

#[tokio::test]
async fn health_and_root_respond() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;

    let health: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");

    let root: Value = reqwest::get(&base).await.unwrap().json().await.unwrap();
    assert_eq!(root["message"], "Flowdeck API");
}

#[tokio::test]
async fn card_create_then_fetch_round_trips_fields() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    let stored = json!({
        "id": "c-77",
        "board_id": "b-1",
        "title": "Prepare demo",
        "description": "For Thursday",
        "status": "in_progress",
        "priority": 2,
        "priority_reason": null,
        "estimated_hours": 3.5,
        "actual_hours": null,
        "deadline": "2026-09-01T12:00:00Z",
        "position": 1,
        "tags": ["demo", "q3"],
        "metadata": {},
        "is_active": true,
        "created_at": "2026-08-07T10:00:00Z",
        "updated_at": "2026-08-07T10:00:00Z",
    });
    store.respond("POST", "cards", 200, json!([stored]));
    store.respond("GET", "cards", 200, json!([stored]));

    let created: Value = client
        .post(format!("{base}/api/cards"))
        .json(&json!({
            "board_id": "b-1",
            "title": "Prepare demo",
            "description": "For Thursday",
            "status": "in_progress",
            "priority": 2,
            "estimated_hours": 3.5,
            "deadline": "2026-09-01T12:00:00Z",
            "position": 1,
            "tags": ["demo", "q3"],
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // The insert body carried our fields plus server-assigned timestamps
    let inserts = store.requests_for("POST", "cards");
    assert_eq!(inserts.len(), 1);
    assert_eq!(inserts[0].body["title"], "Prepare demo");
    assert_eq!(inserts[0].body["status"], "in_progress");
    assert!(inserts[0].body["created_at"].is_string());
    assert!(inserts[0].body["updated_at"].is_string());

    let fetched: Value = client
        .get(format!("{base}/api/cards/c-77"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Identical except nothing: the store row is the source of truth
    assert_eq!(created, fetched);
    assert_eq!(fetched["title"], "Prepare demo");
    assert_eq!(fetched["tags"], json!(["demo", "q3"]));
}

#[tokio::test]
async fn missing_board_yields_404_with_fixed_message() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;

    let response = reqwest::get(format!("{base}/api/boards/nope")).await.unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Board not found");
}

#[tokio::test]
async fn archiving_a_board_cascades_to_its_cards_first() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    store.respond("PATCH", "boards", 200, json!([board_row("b-1", "Work")]));

    let response = client
        .delete(format!("{base}/api/boards/b-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Board archived successfully");

    // Cards are deactivated before the board, both with the same flag flip
    let requests = store.requests();
    let patches: Vec<_> = requests.iter().filter(|r| r.method == "PATCH").collect();
    assert_eq!(patches.len(), 2);
    assert_eq!(patches[0].table, "cards");
    assert!(patches[0].query.contains("board_id=eq.b-1"));
    assert_eq!(patches[0].body["is_active"], false);
    assert_eq!(patches[1].table, "boards");
    assert!(patches[1].query.contains("id=eq.b-1"));
    assert_eq!(patches[1].body["is_active"], false);
}

#[tokio::test]
async fn archiving_a_missing_board_still_404s_after_the_card_sweep() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    // Board patch matches zero rows
    let response = client
        .delete(format!("{base}/api/boards/ghost"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn restoring_a_board_reactivates_cards_and_board() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    store.respond("PATCH", "boards", 200, json!([board_row("b-1", "Work")]));

    let restored: Value = client
        .post(format!("{base}/api/boards/b-1/restore"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(restored["id"], "b-1");

    let requests = store.requests();
    let patches: Vec<_> = requests.iter().filter(|r| r.method == "PATCH").collect();
    assert_eq!(patches.len(), 2);
    assert_eq!(patches[0].table, "cards");
    assert_eq!(patches[0].body["is_active"], true);
    assert_eq!(patches[1].table, "boards");
    assert_eq!(patches[1].body["is_active"], true);
}

#[tokio::test]
async fn reorder_updates_each_entry_and_skips_absent_status() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("{base}/api/cards/reorder"))
        .json(&json!([
            { "id": "c-1", "position": 0, "status": "in_progress" },
            { "id": "c-2", "position": 1 },
        ]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["message"], "Cards reordered successfully");

    let patches = store.requests_for("PATCH", "cards");
    assert_eq!(patches.len(), 2);
    assert!(patches[0].query.contains("id=eq.c-1"));
    assert_eq!(patches[0].body["status"], "in_progress");
    assert!(patches[1].query.contains("id=eq.c-2"));
    assert_eq!(patches[1].body["position"], 1);
    assert!(patches[1].body.get("status").is_none());
}

#[tokio::test]
async fn list_cards_filters_active_and_orders_by_priority() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;

    store.respond(
        "GET",
        "cards",
        200,
        json!([card_row("c-1", "b-1", "First", 1)]),
    );

    let cards: Value = reqwest::get(format!("{base}/api/cards"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cards.as_array().unwrap().len(), 1);

    let fetches = store.requests_for("GET", "cards");
    assert!(fetches[0].query.contains("is_active=eq.true"));
    assert!(fetches[0].query.contains("order=priority"));
}

#[tokio::test]
async fn prioritize_endpoint_reports_applied_assignments() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    store.respond(
        "GET",
        "cards",
        200,
        json!([card_row("c-1", "b-1", "Write report", 3)]),
    );
    store.respond("GET", "boards", 200, json!([board_row("b-1", "Work")]));
    gateway.respond_text(r#"[{"id": "c-1", "priority": 1, "reasoning": "due tomorrow"}]"#);

    let body: Value = client
        .post(format!("{base}/api/ai/prioritize"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["cards_updated"], 1);
    assert_eq!(body["priorities"][0]["id"], "c-1");
    assert_eq!(body["priorities"][0]["priority"], 1);
}

#[tokio::test]
async fn suggest_endpoint_maps_missing_card_to_404() {
    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/ai/suggest"))
        .json(&json!({ "card_id": "c-404" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Card not found");
}

#[tokio::test]
async fn settings_save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("FLOWDECK_CONFIG_DIR", dir.path());

    let store = MockStore::spawn().await;
    let gateway = MockGateway::spawn().await;
    let base = spawn_app(&store, &gateway).await;
    let client = reqwest::Client::new();

    let saved: Value = client
        .post(format!("{base}/api/settings"))
        .json(&json!({
            "store_url": "https://store.example.com",
            "store_key": "key-1",
            "openai_api_key": "sk-9",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved["saved"], true);

    let loaded: Value = client
        .get(format!("{base}/api/settings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded["store_url"], "https://store.example.com");
    assert_eq!(loaded["store_key"], "key-1");
    assert_eq!(loaded["openai_api_key"], "sk-9");
    assert_eq!(loaded["saved"], true);

    std::env::remove_var("FLOWDECK_CONFIG_DIR");
}
