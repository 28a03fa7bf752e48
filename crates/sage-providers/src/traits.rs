//! Model invocation trait — the seam between dispatch and any backend client.
//!
//! `HttpInvoker` in `http_provider.rs` covers the OpenAI-compatible APIs;
//! tests plug in counting doubles.

use async_trait::async_trait;
use serde_json::{Map, Value};

use sage_core::types::{Message, ProviderId, UsageInfo};

use crate::error::InvokeError;

/// Which backend and which model to call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelHandle {
    pub provider: ProviderId,
    pub model: String,
}

/// Provider-specific request options, keyed by provider name.
///
/// E.g. `{"xai": {"reasoning_effort": "high"}}`. An invoker only reads the
/// entry under its own provider's name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderOptions(Map<String, Value>);

impl ProviderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with a single entry for `provider`.
    pub fn single(provider: ProviderId, options: Map<String, Value>) -> Self {
        let mut map = Map::new();
        map.insert(provider.as_str().to_string(), Value::Object(options));
        Self(map)
    }

    /// The option object for one provider, if present.
    pub fn for_provider(&self, provider: ProviderId) -> Option<&Map<String, Value>> {
        self.0.get(provider.as_str()).and_then(Value::as_object)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Generated text plus usage, as returned by the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Generation {
    pub text: String,
    pub usage: UsageInfo,
}

impl Generation {
    pub fn new(text: impl Into<String>, usage: UsageInfo) -> Self {
        Self {
            text: text.into(),
            usage,
        }
    }
}

/// Trait that all model backends implement.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Run one generation.
    ///
    /// # Arguments
    /// * `model`    — Provider and model name to call.
    /// * `messages` — Ordered role-tagged messages (system first, then user).
    /// * `options`  — Provider-specific options keyed by provider name.
    ///
    /// Errors are returned as-is to the caller of the dispatcher.
    async fn generate(
        &self,
        model: &ModelHandle,
        messages: &[Message],
        options: &ProviderOptions,
    ) -> Result<Generation, InvokeError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_keyed_by_provider() {
        let mut inner = Map::new();
        inner.insert("reasoning_effort".to_string(), json!("low"));
        let options = ProviderOptions::single(ProviderId::OpenAi, inner);

        assert_eq!(options.as_value(), json!({"openai": {"reasoning_effort": "low"}}));
        assert!(options.for_provider(ProviderId::OpenAi).is_some());
        assert!(options.for_provider(ProviderId::Xai).is_none());
    }
}
