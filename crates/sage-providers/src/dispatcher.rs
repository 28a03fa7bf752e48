//! Dispatcher — one call config in, one model invocation, one annotated answer out.

use std::sync::Arc;

use tracing::{debug, info};

use sage_core::prompt::build_user_prompt;
use sage_core::types::{CallConfig, Message};

use crate::error::DispatchError;
use crate::registry::ProviderRegistry;
use crate::token_format::format_token_info;
use crate::traits::{Generation, ModelInvoker};

/// Routes call configs to the registered provider strategies.
///
/// Holds no per-request state, so one instance serves concurrent calls.
pub struct Dispatcher {
    providers: ProviderRegistry,
    invoker: Arc<dyn ModelInvoker>,
}

impl Dispatcher {
    pub fn new(providers: ProviderRegistry, invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { providers, invoker }
    }

    /// Invoke the model and append the token usage annotation.
    pub async fn invoke(&self, config: &CallConfig) -> Result<String, DispatchError> {
        let generation = self.invoke_raw(config).await?;
        let token_info =
            format_token_info(config.provider, &generation.usage, config.reasoning_effort);
        Ok(generation.text + &token_info)
    }

    /// Invoke the model and return the un-annotated generation.
    ///
    /// Fails with `UnsupportedProvider` before any invocation when the
    /// provider is not registered. Exactly one invocation otherwise; errors
    /// from the invoker are returned unchanged.
    pub async fn invoke_raw(&self, config: &CallConfig) -> Result<Generation, DispatchError> {
        let strategy = self.providers.get(config.provider)?;

        let user_prompt = match &config.user_prompt {
            Some(prompt) => prompt.clone(),
            None => build_user_prompt(&config.task, &config.code, config.analysis_type),
        };

        let model = strategy.model();
        let options = strategy.map_options(config.reasoning_effort);
        let messages = [
            Message::system(config.system_prompt.as_str()),
            Message::user(user_prompt),
        ];

        info!(
            provider = strategy.spec().display_name,
            model = %model.model,
            analysis = %config.analysis_type,
            effort = %config.reasoning_effort,
            invoker = self.invoker.display_name(),
            "dispatching request"
        );

        let generation = self.invoker.generate(&model, &messages, &options).await?;

        debug!(
            provider = strategy.spec().display_name,
            chars = generation.text.len(),
            total_tokens = generation.usage.total(),
            "dispatch complete"
        );

        Ok(generation)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
