//! Configuration for the Flowdeck server.
//!
//! Values come from the process environment after loading an env-file
//! chain: the project-local `.env` first, then the well-known
//! `~/.flowdeck/.env` written by the settings endpoints. `dotenvy` never
//! overrides variables that are already set, so the load order makes the
//! project-local file win. Missing files and missing keys yield defaults,
//! never a startup failure.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use flowdeck_common::{FlowdeckError, FlowdeckResult};
use serde::{Deserialize, Serialize};

/// Default listen port. High to avoid clashing with common dev servers.
pub const DEFAULT_PORT: u16 = 51723;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted datastore.
    pub store_url: String,
    /// API key for the hosted datastore.
    pub store_key: String,
    /// API key for the LLM gateway.
    pub openai_api_key: String,
    /// Model identifier used for all AI operations.
    pub openai_model: String,
    /// HTTP listen port.
    pub port: u16,
    /// HTTP bind host.
    pub host: String,
}

impl Config {
    /// Load the env-file chain, then read the process environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        if let Some(path) = settings_file() {
            dotenvy::from_path(&path).ok();
        }
        Self::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: env::var("STORE_URL").unwrap_or_default(),
            store_key: env::var("STORE_KEY").unwrap_or_default(),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            port: env::var("FLOWDECK_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            host: env::var("FLOWDECK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
        }
    }
}

/// Directory holding the well-known settings file.
///
/// `FLOWDECK_CONFIG_DIR` overrides the default `~/.flowdeck`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var("FLOWDECK_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".flowdeck"))
}

/// Path of the well-known settings file, if a config directory resolves.
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(".env"))
}

/// Keys persisted through the settings endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default)]
    pub store_url: String,
    #[serde(default)]
    pub store_key: String,
    #[serde(default)]
    pub openai_api_key: String,
    /// Whether a settings file existed (on load) or was written (on save).
    #[serde(default)]
    pub saved: bool,
}

/// Read settings from the well-known env file.
///
/// A missing file is not an error: empty values with `saved = false`.
pub fn load_settings() -> FlowdeckResult<StoredSettings> {
    match settings_file() {
        Some(path) if path.exists() => load_settings_from(&path),
        _ => Ok(StoredSettings::default()),
    }
}

fn load_settings_from(path: &Path) -> FlowdeckResult<StoredSettings> {
    let contents = fs::read_to_string(path).map_err(|e| FlowdeckError::Config {
        reason: format!("failed to read {}: {e}", path.display()),
    })?;

    let mut settings = StoredSettings {
        saved: true,
        ..StoredSettings::default()
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim().trim_matches('"').trim_matches('\'');
        match key.as_str() {
            "store_url" => settings.store_url = value.to_string(),
            "store_key" => settings.store_key = value.to_string(),
            "openai_api_key" => settings.openai_api_key = value.to_string(),
            _ => {}
        }
    }
    Ok(settings)
}

/// Write settings to the well-known env file, creating the directory.
pub fn save_settings(settings: &StoredSettings) -> FlowdeckResult<StoredSettings> {
    let dir = config_dir().ok_or_else(|| FlowdeckError::Config {
        reason: "no home directory to place the settings file in".to_string(),
    })?;
    fs::create_dir_all(&dir).map_err(|e| FlowdeckError::Config {
        reason: format!("failed to create {}: {e}", dir.display()),
    })?;

    let path = dir.join(".env");
    let contents = format!(
        "# Flowdeck configuration\nSTORE_URL={}\nSTORE_KEY={}\nOPENAI_API_KEY={}\n",
        settings.store_url, settings.store_key, settings.openai_api_key,
    );
    fs::write(&path, contents).map_err(|e| FlowdeckError::Config {
        reason: format!("failed to write {}: {e}", path.display()),
    })?;

    Ok(StoredSettings {
        store_url: settings.store_url.clone(),
        store_key: settings.store_key.clone(),
        openai_api_key: settings.openai_api_key.clone(),
        saved: true,
    })
}
