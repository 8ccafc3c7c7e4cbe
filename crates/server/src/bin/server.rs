//! Flowdeck server binary.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flowdeck_server::ai::{AiService, OpenAiProvider};
use flowdeck_server::config::Config;
use flowdeck_server::http::{build_router, AppState};
use flowdeck_server::store::StoreClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("flowdeck_server=info".parse()?))
        .init();

    info!("Starting Flowdeck server...");

    let config = Config::load();

    if config.store_url.is_empty() {
        info!("STORE_URL not configured - datastore calls will fail until settings are saved");
    }
    if config.openai_api_key.is_empty() {
        info!("OPENAI_API_KEY not configured - AI operations are disabled");
    }

    // Both handles are constructed once and shared across requests
    let store = Arc::new(
        StoreClient::new(&config.store_url, &config.store_key)
            .context("Failed to build store client")?,
    );
    let provider = Arc::new(OpenAiProvider::new(config.openai_api_key.clone()));
    let ai = Arc::new(AiService::new(
        store.clone(),
        provider,
        config.openai_model.clone(),
    ));

    let state = AppState {
        config: config.clone(),
        store,
        ai,
    };
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(host = %config.host, port = config.port, "Flowdeck server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
