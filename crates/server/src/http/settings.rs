//! Settings handlers.
//!
//! API keys are persisted in the well-known env file so the desktop
//! frontend can configure the backend without a restart script.

use axum::Json;
use serde::Deserialize;

use crate::config::{self, StoredSettings};

use super::ApiError;

/// Keys accepted from the frontend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub store_url: String,
    #[serde(default)]
    pub store_key: String,
    #[serde(default)]
    pub openai_api_key: String,
}

/// Load settings from the well-known env file.
pub async fn get_settings() -> Result<Json<StoredSettings>, ApiError> {
    Ok(Json(config::load_settings()?))
}

/// Save settings to the well-known env file.
pub async fn save_settings(
    Json(request): Json<SettingsUpdate>,
) -> Result<Json<StoredSettings>, ApiError> {
    let saved = config::save_settings(&StoredSettings {
        store_url: request.store_url,
        store_key: request.store_key,
        openai_api_key: request.openai_api_key,
        saved: false,
    })?;
    Ok(Json(saved))
}
