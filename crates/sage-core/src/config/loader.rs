//! Config loader — reads `~/.sage/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.sage/config.json`
//! 3. Environment variables (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;
use crate::types::ProviderId;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `XAI_MODEL`, `OPENAI_MODEL` → `providers.<name>.model`
/// - `XAI_API_KEY`, `OPENAI_API_KEY` → `providers.<name>.api_key`
/// - `SAGE_PROVIDERS__<NAME>__API_KEY` / `__API_BASE` / `__MODEL` (win over the plain vars)
/// - `SAGE_DEFAULTS__PERSONA` → `defaults.persona`
/// - `SAGE_DEFAULTS__PROVIDER` → `defaults.provider`
/// - `SAGE_DEFAULTS__REASONING_EFFORT` → `defaults.reasoning_effort`
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    for id in ProviderId::ALL {
        let name = id.as_str().to_uppercase();
        let provider = config.providers.get_mut(id);

        if let Some(val) = var(&format!("{name}_API_KEY")) {
            provider.api_key = val;
        }
        if let Some(val) = var(&format!("{name}_MODEL")) {
            provider.model = Some(val);
        }
        if let Some(val) = var(&format!("SAGE_PROVIDERS__{name}__API_KEY")) {
            provider.api_key = val;
        }
        if let Some(val) = var(&format!("SAGE_PROVIDERS__{name}__API_BASE")) {
            provider.api_base = Some(val);
        }
        if let Some(val) = var(&format!("SAGE_PROVIDERS__{name}__MODEL")) {
            provider.model = Some(val);
        }
    }

    if let Some(val) = var("SAGE_DEFAULTS__PERSONA") {
        config.defaults.persona = val;
    }
    if let Some(val) = var("SAGE_DEFAULTS__PROVIDER") {
        config.defaults.provider = Some(val);
    }
    if let Some(val) = var("SAGE_DEFAULTS__REASONING_EFFORT") {
        config.defaults.reasoning_effort = Some(val);
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
