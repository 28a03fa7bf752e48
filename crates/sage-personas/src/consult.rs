//! Consultation — persona and dispatcher glued together for one request.

use tracing::{debug, info};

use sage_core::prompt::{base_system_prompt, build_user_prompt};
use sage_core::types::{CallConfig, ProviderId};
use sage_providers::{format_token_info, Dispatcher};

use crate::context::PersonaContext;
use crate::error::PersonaError;
use crate::persona::Persona;
use crate::registry::PersonaRegistry;

/// One consultation request.
#[derive(Clone, Debug)]
pub struct ConsultRequest {
    /// Persona id, e.g. `"charles"`.
    pub persona: String,
    /// `None` uses the persona's preferred provider.
    pub provider: Option<ProviderId>,
    pub task: String,
    pub code: String,
    pub context: PersonaContext,
}

impl ConsultRequest {
    pub fn new(
        persona: impl Into<String>,
        task: impl Into<String>,
        code: impl Into<String>,
        context: PersonaContext,
    ) -> Self {
        Self {
            persona: persona.into(),
            provider: None,
            task: task.into(),
            code: code.into(),
            context,
        }
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }
}

/// Run a request through its persona and the dispatcher.
///
/// Prompts are enhanced by the persona, the model is invoked once, and the
/// raw text is processed and formatted before the token annotation is
/// appended.
pub async fn consult(
    registry: &PersonaRegistry,
    dispatcher: &Dispatcher,
    request: &ConsultRequest,
) -> Result<String, PersonaError> {
    let persona = registry.require(&request.persona)?;

    let provider = request.provider.unwrap_or_else(|| persona.preferred_provider());
    let effort = request
        .context
        .reasoning_effort
        .unwrap_or_else(|| persona.preferred_effort());
    let context = request.context.clone().with_reasoning_effort(effort);
    let analysis_type = context.analysis_type;

    let system_prompt = persona.enhance_system_prompt(base_system_prompt(analysis_type), &context);
    let user_prompt = persona.enhance_user_prompt(
        &build_user_prompt(&request.task, &request.code, analysis_type),
        &context,
    );

    info!(
        persona = persona.id(),
        provider = %provider,
        analysis = %analysis_type,
        effort = %effort,
        "consulting"
    );

    let config = CallConfig::new(
        system_prompt,
        request.task.as_str(),
        request.code.as_str(),
        analysis_type,
        effort,
        provider,
    )
    .with_user_prompt(user_prompt);

    let generation = dispatcher.invoke_raw(&config).await?;

    let processed = persona.process_response(&generation.text, &context);
    let formatted = persona.format_output(&processed, &context);
    debug!(persona = persona.id(), chars = formatted.len(), "consultation complete");

    Ok(formatted + &format_token_info(provider, &generation.usage, effort))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use sage_core::config::ProvidersConfig;
    use sage_core::types::{AnalysisType, Message, ReasoningEffort, UsageInfo};
    use sage_providers::{
        Generation, InvokeError, ModelHandle, ModelInvoker, ProviderOptions, ProviderRegistry,
        ProviderStrategy,
    };
    use sage_providers::registry::XAI;

    use crate::charles::CharlesPersona;
    use crate::context::OutputFormat;

    type Captured = (ModelHandle, Vec<Message>, ProviderOptions);

    /// Invoker double that records the last request and replies with fixed text.
    struct CapturingInvoker {
        reply: String,
        calls: AtomicUsize,
        last: Mutex<Option<Captured>>,
    }

    impl CapturingInvoker {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn last(&self) -> Captured {
            self.last.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl ModelInvoker for CapturingInvoker {
        async fn generate(
            &self,
            model: &ModelHandle,
            messages: &[Message],
            options: &ProviderOptions,
        ) -> Result<Generation, InvokeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((model.clone(), messages.to_vec(), options.clone()));
            Ok(Generation::new(self.reply.clone(), UsageInfo::new(100, 40)))
        }

        fn display_name(&self) -> &str {
            "capturing"
        }
    }

    fn setup(invoker: Arc<CapturingInvoker>) -> (PersonaRegistry, Dispatcher) {
        let registry = PersonaRegistry::with_builtin().unwrap();
        let providers = ProviderRegistry::from_config(&ProvidersConfig::default());
        (registry, Dispatcher::new(providers, invoker))
    }

    #[tokio::test]
    async fn test_consult_uses_persona_preferences() {
        let invoker = CapturingInvoker::replying("Optimise nothing yet.");
        let (registry, dispatcher) = setup(invoker.clone());
        let request = ConsultRequest::new(
            "charles",
            "should I add a cache?",
            "fn get() {}",
            PersonaContext::new(AnalysisType::Advice),
        );

        let out = consult(&registry, &dispatcher, &request).await.unwrap();

        let expected_tail =
            format_token_info(ProviderId::OpenAi, &UsageInfo::new(100, 40), ReasoningEffort::High);
        assert_eq!(out, format!("optimize nothing yet.{expected_tail}"));

        let (model, messages, options) = invoker.last();
        assert_eq!(model.provider, ProviderId::OpenAi);
        assert_eq!(
            options.for_provider(ProviderId::OpenAi).unwrap()["reasoning_effort"],
            "high"
        );
        assert!(messages[0].content().starts_with(base_system_prompt(AnalysisType::Advice)));
        assert!(messages[0].content().contains("Think deeply"));
    }

    #[tokio::test]
    async fn test_consult_prompts_are_persona_enhanced() {
        let invoker = CapturingInvoker::replying("ok");
        let (registry, dispatcher) = setup(invoker.clone());
        let context = PersonaContext::new(AnalysisType::Review)
            .with_reasoning_effort(ReasoningEffort::Low);
        let request = ConsultRequest::new("charles", "review this", "let x = 1;", context.clone())
            .with_provider(ProviderId::Xai);

        consult(&registry, &dispatcher, &request).await.unwrap();

        let charles = CharlesPersona::new();
        let (model, messages, _) = invoker.last();
        assert_eq!(model.provider, ProviderId::Xai);
        assert_eq!(
            messages[0],
            Message::system(charles.enhance_system_prompt(
                base_system_prompt(AnalysisType::Review),
                &context
            ))
        );
        assert_eq!(
            messages[1],
            Message::user(charles.enhance_user_prompt(
                &build_user_prompt("review this", "let x = 1;", AnalysisType::Review),
                &context
            ))
        );
        assert!(!messages[0].content().contains("Think deeply"));
    }

    #[tokio::test]
    async fn test_consult_formats_after_processing() {
        let invoker = CapturingInvoker::replying("a\nb\nc\nBehaviour is fine");
        let (registry, dispatcher) = setup(invoker);
        let context = PersonaContext::new(AnalysisType::Review)
            .with_reasoning_effort(ReasoningEffort::Medium)
            .with_output_format(OutputFormat::Dual);
        let request = ConsultRequest::new("charles", "t", "c", context)
            .with_provider(ProviderId::Xai);

        let out = consult(&registry, &dispatcher, &request).await.unwrap();

        assert!(out.starts_with("**TL;DR**\na\nb\nc\n\n**Detailed Analysis**\nbehavior is fine\n\n---\n*xAI"));
    }

    #[tokio::test]
    async fn test_consult_unknown_persona_makes_no_call() {
        let invoker = CapturingInvoker::replying("unused");
        let (registry, dispatcher) = setup(invoker.clone());
        let request = ConsultRequest::new(
            "moriarty",
            "t",
            "c",
            PersonaContext::new(AnalysisType::Research),
        );

        let err = consult(&registry, &dispatcher, &request).await.unwrap_err();

        assert!(matches!(err, PersonaError::UnknownPersona(_)));
        assert_eq!(invoker.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_consult_unregistered_provider() {
        let invoker = CapturingInvoker::replying("unused");
        let registry = PersonaRegistry::with_builtin().unwrap();
        let mut providers = ProviderRegistry::new();
        providers.register(ProviderStrategy::new(&XAI));
        let dispatcher = Dispatcher::new(providers, invoker.clone());

        // Charles prefers OpenAI, which is not registered here.
        let request = ConsultRequest::new(
            "charles",
            "t",
            "c",
            PersonaContext::new(AnalysisType::Review),
        );
        let err = consult(&registry, &dispatcher, &request).await.unwrap_err();

        match err {
            PersonaError::Dispatch(ref inner) => assert!(inner.is_unsupported_provider()),
            ref other => panic!("expected dispatch error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "Unsupported provider: openai");
        assert_eq!(invoker.calls.load(Ordering::SeqCst), 0);
    }
}
