//! Provider registry — static specs for the supported model backends.
//!
//! Each `ProviderSpec` describes how to reach a provider: env var names,
//! default model, default API base, and how a [`ReasoningEffort`] becomes
//! provider options. A [`ProviderRegistry`] holds the per-process
//! [`ProviderStrategy`] for every provider a caller may use.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, info};

use sage_core::config::{ProviderConfig, ProvidersConfig};
use sage_core::types::{ProviderId, ReasoningEffort};
use sage_core::ConfigError;

use crate::traits::{ModelHandle, ProviderOptions};

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one model provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub id: ProviderId,
    /// Human-readable name for logs and annotations. E.g. `"xAI"`.
    pub display_name: &'static str,
    /// Environment variable for the API key.
    pub env_key: &'static str,
    /// Environment variable overriding the default model.
    pub env_model: &'static str,
    /// Model used when nothing overrides it.
    pub default_model: &'static str,
    /// OpenAI-compatible API base.
    pub default_api_base: &'static str,
    /// Maps an effort level to this provider's option object.
    pub map_effort: fn(ReasoningEffort) -> Map<String, Value>,
}

fn xai_effort(effort: ReasoningEffort) -> Map<String, Value> {
    let level = match effort {
        ReasoningEffort::Low => "low",
        ReasoningEffort::Medium => "medium",
        ReasoningEffort::High => "high",
    };
    let mut options = Map::new();
    options.insert("reasoning_effort".to_string(), Value::from(level));
    options
}

fn openai_effort(effort: ReasoningEffort) -> Map<String, Value> {
    let level = match effort {
        ReasoningEffort::Low => "low",
        ReasoningEffort::Medium => "medium",
        ReasoningEffort::High => "high",
    };
    let mut options = Map::new();
    options.insert("reasoning_effort".to_string(), Value::from(level));
    options
}

pub static XAI: ProviderSpec = ProviderSpec {
    id: ProviderId::Xai,
    display_name: "xAI",
    env_key: "XAI_API_KEY",
    env_model: "XAI_MODEL",
    default_model: "grok-4.1",
    default_api_base: "https://api.x.ai/v1",
    map_effort: xai_effort,
};

pub static OPENAI: ProviderSpec = ProviderSpec {
    id: ProviderId::OpenAi,
    display_name: "OpenAI",
    env_key: "OPENAI_API_KEY",
    env_model: "OPENAI_MODEL",
    default_model: "gpt-5.2",
    default_api_base: "https://api.openai.com/v1",
    map_effort: openai_effort,
};

/// Every supported provider, in display order.
pub static PROVIDERS: &[&ProviderSpec] = &[&XAI, &OPENAI];

/// The static spec for a provider id.
pub fn spec_for(id: ProviderId) -> &'static ProviderSpec {
    match id {
        ProviderId::Xai => &XAI,
        ProviderId::OpenAi => &OPENAI,
    }
}

// ─────────────────────────────────────────────
// ProviderStrategy — model selection + option mapping
// ─────────────────────────────────────────────

/// How to call one provider: which model, and how to phrase options.
#[derive(Clone, Debug)]
pub struct ProviderStrategy {
    spec: &'static ProviderSpec,
    model: String,
}

impl ProviderStrategy {
    /// Strategy using the spec's default model.
    pub fn new(spec: &'static ProviderSpec) -> Self {
        Self {
            spec,
            model: spec.default_model.to_string(),
        }
    }

    /// Strategy whose model comes from config, falling back to the default.
    pub fn from_config(spec: &'static ProviderSpec, config: &ProviderConfig) -> Self {
        let model = config
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| spec.default_model.to_string());
        Self { spec, model }
    }

    pub fn spec(&self) -> &'static ProviderSpec {
        self.spec
    }

    pub fn id(&self) -> ProviderId {
        self.spec.id
    }

    /// The model to call. Depends only on configuration.
    pub fn model(&self) -> ModelHandle {
        ModelHandle {
            provider: self.spec.id,
            model: self.model.clone(),
        }
    }

    /// Provider options for an effort level, keyed by provider name.
    pub fn map_options(&self, effort: ReasoningEffort) -> ProviderOptions {
        ProviderOptions::single(self.spec.id, (self.spec.map_effort)(effort))
    }
}

// ─────────────────────────────────────────────
// ProviderRegistry
// ─────────────────────────────────────────────

/// Strategies keyed by provider id. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct ProviderRegistry {
    strategies: HashMap<ProviderId, ProviderStrategy>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in provider, models resolved from config.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let mut registry = Self::new();
        for spec in PROVIDERS {
            registry.register(ProviderStrategy::from_config(spec, config.get(spec.id)));
        }
        registry
    }

    /// Register a strategy. Overwrites any previous strategy for the same provider.
    pub fn register(&mut self, strategy: ProviderStrategy) {
        info!(
            provider = strategy.spec.display_name,
            model = %strategy.model,
            "registered provider"
        );
        self.strategies.insert(strategy.id(), strategy);
    }

    /// Look up a strategy. Unregistered providers are a configuration error.
    pub fn get(&self, id: ProviderId) -> Result<&ProviderStrategy, ConfigError> {
        self.strategies.get(&id).ok_or_else(|| {
            debug!(provider = %id, "provider not registered");
            ConfigError::UnsupportedProvider(id.to_string())
        })
    }

    /// Registered provider ids, in display order.
    pub fn ids(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.strategies.contains_key(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
