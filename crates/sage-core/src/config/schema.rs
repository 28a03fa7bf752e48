//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `DefaultsConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

use crate::types::ProviderId;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.sage/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub defaults: DefaultsConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single model backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for bearer authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Model override (otherwise the provider's built-in default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// One `ProviderConfig` per supported backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub xai: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, id: ProviderId) -> &ProviderConfig {
        match id {
            ProviderId::Xai => &self.xai,
            ProviderId::OpenAi => &self.openai,
        }
    }

    pub fn get_mut(&mut self, id: ProviderId) -> &mut ProviderConfig {
        match id {
            ProviderId::Xai => &mut self.xai,
            ProviderId::OpenAi => &mut self.openai,
        }
    }
}

// ─────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────

/// Request defaults used when the caller leaves an option out.
///
/// `provider` and `reasoning_effort` stay as strings here; they are parsed
/// strictly at the point of use so a typo is reported, not swallowed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultsConfig {
    /// Persona id to consult when none is given.
    pub persona: String,
    /// Provider override; `None` means the persona's preferred provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Effort override; `None` means the persona's preferred effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            persona: "charles".to_string(),
            provider: None,
            reasoning_effort: None,
        }
    }
}
