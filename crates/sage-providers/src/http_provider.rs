//! Generic HTTP model client for OpenAI-compatible APIs.
//!
//! Talks directly to `/chat/completions` for every provider in the registry;
//! xAI and OpenAI share the wire shape, so a single client covers both.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use sage_core::config::ProvidersConfig;
use sage_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message, ProviderId};

use crate::error::InvokeError;
use crate::registry::{spec_for, PROVIDERS};
use crate::traits::{Generation, ModelHandle, ModelInvoker, ProviderOptions};

/// Where and how to reach one provider.
#[derive(Clone)]
struct Endpoint {
    api_base: String,
    api_key: String,
}

// ─────────────────────────────────────────────
// HttpInvoker
// ─────────────────────────────────────────────

/// A model invoker that talks to any OpenAI-compatible HTTP API.
pub struct HttpInvoker {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Endpoint per provider.
    endpoints: HashMap<ProviderId, Endpoint>,
}

impl std::fmt::Debug for HttpInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bases: HashMap<&str, &str> = self
            .endpoints
            .iter()
            .map(|(id, ep)| (id.as_str(), ep.api_base.as_str()))
            .collect();
        f.debug_struct("HttpInvoker").field("endpoints", &bases).finish()
    }
}

impl HttpInvoker {
    /// Create an invoker for every built-in provider.
    ///
    /// API base resolution: config > spec default.
    pub fn new(config: &ProvidersConfig) -> Result<Self, InvokeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;

        let endpoints = PROVIDERS
            .iter()
            .map(|spec| {
                let provider = config.get(spec.id);
                let api_base = provider
                    .api_base
                    .clone()
                    .unwrap_or_else(|| spec.default_api_base.to_string());
                if !provider.is_configured() {
                    debug!(provider = spec.display_name, "no API key configured");
                }
                (
                    spec.id,
                    Endpoint {
                        api_base,
                        api_key: provider.api_key.clone(),
                    },
                )
            })
            .collect();

        Ok(Self { client, endpoints })
    }

    /// Build the full chat completions URL for a provider.
    fn completions_url(&self, provider: ProviderId) -> Option<String> {
        self.endpoints.get(&provider).map(|ep| {
            let base = ep.api_base.trim_end_matches('/');
            format!("{}/chat/completions", base)
        })
    }
}

#[async_trait]
impl ModelInvoker for HttpInvoker {
    async fn generate(
        &self,
        model: &ModelHandle,
        messages: &[Message],
        options: &ProviderOptions,
    ) -> Result<Generation, InvokeError> {
        let spec = spec_for(model.provider);
        let endpoint = self
            .endpoints
            .get(&model.provider)
            .filter(|ep| !ep.api_key.is_empty())
            .ok_or(InvokeError::NotConfigured(model.provider))?;
        let url = self
            .completions_url(model.provider)
            .ok_or(InvokeError::NotConfigured(model.provider))?;

        let request_body = ChatCompletionRequest {
            model: model.model.clone(),
            messages: messages.to_vec(),
            options: options
                .for_provider(model.provider)
                .cloned()
                .unwrap_or_default(),
        };

        debug!(
            provider = spec.display_name,
            model = %model.model,
            messages = messages.len(),
            "Calling model"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&endpoint.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = spec.display_name, error = %e, "HTTP request failed");
                InvokeError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = spec.display_name,
                status = %status,
                body = %body,
                "API error"
            );
            return Err(InvokeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat_resp: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(provider = spec.display_name, error = %e, "Failed to parse model response");
            InvokeError::Http(e)
        })?;

        let usage = chat_resp.usage.unwrap_or_default();
        let choice = chat_resp
            .choices
            .into_iter()
            .next()
            .ok_or(InvokeError::EmptyResponse)?;

        let text = match choice.message.content {
            Some(text) => text,
            None => {
                warn!(provider = spec.display_name, "response has no content");
                String::new()
            }
        };

        debug!(
            provider = spec.display_name,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("?"),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Model response received"
        );

        Ok(Generation { text, usage })
    }

    fn display_name(&self) -> &str {
        "http"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ProviderStrategy;
    use sage_core::config::ProviderConfig;
    use sage_core::types::{ReasoningEffort, UsageInfo};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> ProvidersConfig {
        let provider = ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
            model: None,
        };
        ProvidersConfig {
            xai: provider.clone(),
            openai: provider,
        }
    }

    fn handle(provider: ProviderId, model: &str) -> ModelHandle {
        ModelHandle {
            provider,
            model: model.to_string(),
        }
    }

    fn messages() -> Vec<Message> {
        vec![Message::system("You are Charles."), Message::user("Hello")]
    }

    // ── Unit tests ──

    #[test]
    fn test_completions_url_trailing_slash() {
        let invoker = HttpInvoker::new(&make_config("key", Some("https://api.x.ai/v1/"))).unwrap();
        assert_eq!(
            invoker.completions_url(ProviderId::Xai).unwrap(),
            "https://api.x.ai/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_bases() {
        let invoker = HttpInvoker::new(&ProvidersConfig::default()).unwrap();
        assert_eq!(
            invoker.completions_url(ProviderId::Xai).unwrap(),
            "https://api.x.ai/v1/chat/completions"
        );
        assert_eq!(
            invoker.completions_url(ProviderId::OpenAi).unwrap(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": { "content": "Right then." },
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 10,
                    "completion_tokens": 5,
                    "total_tokens": 15
                }
            })))
            .mount(&mock_server)
            .await;

        let invoker =
            HttpInvoker::new(&make_config("test-key-123", Some(&mock_server.uri()))).unwrap();

        let generation = invoker
            .generate(&handle(ProviderId::Xai, "grok-4.1"), &messages(), &ProviderOptions::new())
            .await
            .unwrap();

        assert_eq!(generation.text, "Right then.");
        assert_eq!(generation.usage.prompt_tokens, 10);
        assert_eq!(generation.usage.total(), 15);
    }

    #[tokio::test]
    async fn test_generate_sends_model_and_provider_options() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-5.2",
                "reasoning_effort": "high",
                "messages": [
                    { "role": "system", "content": "You are Charles." },
                    { "role": "user", "content": "Hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-body",
                "choices": [{ "message": { "content": "ok" }, "finish_reason": "stop" }],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let invoker = HttpInvoker::new(&make_config("key", Some(&mock_server.uri()))).unwrap();
        let options = ProviderStrategy::new(spec_for(ProviderId::OpenAi))
            .map_options(ReasoningEffort::High);

        let generation = invoker
            .generate(&handle(ProviderId::OpenAi, "gpt-5.2"), &messages(), &options)
            .await
            .unwrap();

        // If the body matcher fails, wiremock returns 404 → we'd get an error
        assert_eq!(generation.text, "ok");
        assert_eq!(generation.usage, UsageInfo::default());
    }

    #[tokio::test]
    async fn test_generate_ignores_other_providers_options() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "reasoning_effort": "low" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "wrong" }, "finish_reason": "stop" }]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "plain" }, "finish_reason": "stop" }]
            })))
            .mount(&mock_server)
            .await;

        let invoker = HttpInvoker::new(&make_config("key", Some(&mock_server.uri()))).unwrap();
        // Options addressed to OpenAI must not leak into an xAI request.
        let options = ProviderStrategy::new(spec_for(ProviderId::OpenAi))
            .map_options(ReasoningEffort::Low);

        let generation = invoker
            .generate(&handle(ProviderId::Xai, "grok-4.1"), &messages(), &options)
            .await
            .unwrap();
        assert_eq!(generation.text, "plain");
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "message": "Rate limit exceeded", "type": "rate_limit_error" }
            })))
            .mount(&mock_server)
            .await;

        let invoker = HttpInvoker::new(&make_config("key", Some(&mock_server.uri()))).unwrap();

        let err = invoker
            .generate(&handle(ProviderId::OpenAi, "gpt-5.2"), &messages(), &ProviderOptions::new())
            .await
            .unwrap_err();

        match err {
            InvokeError::Status { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit exceeded"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_empty_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-empty",
                "choices": [],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let invoker = HttpInvoker::new(&make_config("key", Some(&mock_server.uri()))).unwrap();
        let err = invoker
            .generate(&handle(ProviderId::Xai, "grok-4.1"), &messages(), &ProviderOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_generate_network_error() {
        // Point to a port that's not listening
        let invoker = HttpInvoker::new(&make_config("key", Some("http://127.0.0.1:1"))).unwrap();

        let err = invoker
            .generate(&handle(ProviderId::Xai, "grok-4.1"), &messages(), &ProviderOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::Http(_)));
    }

    #[tokio::test]
    async fn test_generate_without_api_key() {
        let invoker = HttpInvoker::new(&ProvidersConfig::default()).unwrap();
        let err = invoker
            .generate(&handle(ProviderId::OpenAi, "gpt-5.2"), &messages(), &ProviderOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::NotConfigured(ProviderId::OpenAi)));
    }
}
