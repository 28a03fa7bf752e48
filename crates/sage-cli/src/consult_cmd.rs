//! `sage consult` — run one consultation and print the persona's answer.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use sage_core::config::{load_config, Config};
use sage_core::types::{AnalysisType, ProviderId, ReasoningEffort};
use sage_personas::{
    consult, AudienceLevel, ConsultRequest, OutputFormat, PersonaContext, PersonaRegistry,
    ToneStyle,
};
use sage_providers::{Dispatcher, HttpInvoker, ProviderRegistry};

use crate::helpers;

#[derive(Args, Debug, Default)]
pub struct ConsultArgs {
    /// What you want from the persona
    #[arg(short, long)]
    pub task: String,

    /// Code to analyse, inline
    #[arg(short, long, conflicts_with = "file")]
    pub code: Option<String>,

    /// Read the code to analyse from a file
    #[arg(short, long)]
    pub file: Option<String>,

    /// Persona id (defaults to the configured persona)
    #[arg(short, long)]
    pub persona: Option<String>,

    /// Provider: xai | openai (defaults to the persona's preference)
    #[arg(long)]
    pub provider: Option<String>,

    /// Analysis type: comprehensive | advice | research | review
    #[arg(short, long, default_value = "review")]
    pub analysis: String,

    /// Reasoning effort: low | medium | high
    #[arg(short, long)]
    pub effort: Option<String>,

    /// Tone: concise | humorous | straight | detailed
    #[arg(long)]
    pub tone: Option<String>,

    /// Output format: tldr | dual | detailed
    #[arg(long)]
    pub format: Option<String>,

    /// Audience: beginner | expert | auto
    #[arg(long)]
    pub audience: Option<String>,

    /// Free-text constraints, e.g. "a two-week deadline"
    #[arg(long)]
    pub constraints: Option<String>,

    /// Ask for Mermaid diagrams where helpful
    #[arg(long, default_value_t = false)]
    pub diagrams: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub logs: bool,
}

/// Run the consult command.
pub async fn run(args: ConsultArgs) -> Result<()> {
    let config = load_config(None);
    let request = build_request(&args, &config)?;

    let personas = PersonaRegistry::with_builtin().context("failed to load personas")?;
    let persona_name = personas
        .require(&request.persona)
        .with_context(|| format!("available personas: {}", personas.ids().join(", ")))?
        .name()
        .to_string();

    let invoker = HttpInvoker::new(&config.providers).context("failed to build HTTP client")?;
    let dispatcher = Dispatcher::new(
        ProviderRegistry::from_config(&config.providers),
        Arc::new(invoker),
    );

    info!(persona = %request.persona, "starting consultation");
    let response = consult(&personas, &dispatcher, &request)
        .await
        .context("consultation failed")?;

    helpers::print_response(&persona_name, &response);
    Ok(())
}

/// Turn CLI arguments plus config defaults into a request.
///
/// Analysis type, provider, and effort are parsed strictly; presentation
/// options fall back to their defaults.
pub fn build_request(args: &ConsultArgs, config: &Config) -> Result<ConsultRequest> {
    let defaults = &config.defaults;

    let analysis_type: AnalysisType = args.analysis.parse()?;

    let provider = args
        .provider
        .as_deref()
        .or(defaults.provider.as_deref())
        .map(str::parse::<ProviderId>)
        .transpose()?;

    let effort = args
        .effort
        .as_deref()
        .or(defaults.reasoning_effort.as_deref())
        .map(str::parse::<ReasoningEffort>)
        .transpose()?;

    let mut context = PersonaContext::new(analysis_type)
        .with_tone(args.tone.as_deref().map(ToneStyle::parse_lenient).unwrap_or_default())
        .with_output_format(
            args.format
                .as_deref()
                .map(OutputFormat::parse_lenient)
                .unwrap_or_default(),
        )
        .with_audience(
            args.audience
                .as_deref()
                .map(AudienceLevel::parse_lenient)
                .unwrap_or_default(),
        )
        .with_diagrams(args.diagrams);
    if let Some(effort) = effort {
        context = context.with_reasoning_effort(effort);
    }
    if let Some(constraints) = &args.constraints {
        context = context.with_user_constraints(constraints.as_str());
    }

    let persona = args
        .persona
        .clone()
        .unwrap_or_else(|| defaults.persona.clone());

    let mut request = ConsultRequest::new(persona, args.task.as_str(), read_code(args)?, context);
    request.provider = provider;
    Ok(request)
}

/// Code from `--code`, else the contents of `--file`, else empty.
fn read_code(args: &ConsultArgs) -> Result<String> {
    if let Some(code) = &args.code {
        return Ok(code.clone());
    }
    match &args.file {
        Some(path) => {
            let path = helpers::expand_tilde(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))
        }
        None => Ok(String::new()),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(task: &str) -> ConsultArgs {
        ConsultArgs {
            task: task.to_string(),
            analysis: "review".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_from_config() {
        let mut config = Config::default();
        config.defaults.provider = Some("xai".to_string());
        config.defaults.reasoning_effort = Some("low".to_string());

        let request = build_request(&args("look"), &config).unwrap();

        assert_eq!(request.persona, "charles");
        assert_eq!(request.provider, Some(ProviderId::Xai));
        assert_eq!(request.context.reasoning_effort, Some(ReasoningEffort::Low));
        assert_eq!(request.context.analysis_type, AnalysisType::Review);
        assert_eq!(request.code, "");
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.defaults.provider = Some("xai".to_string());
        let mut a = args("look");
        a.provider = Some("openai".to_string());
        a.effort = Some("medium".to_string());
        a.analysis = "advice".to_string();
        a.code = Some("fn main() {}".to_string());

        let request = build_request(&a, &config).unwrap();

        assert_eq!(request.provider, Some(ProviderId::OpenAi));
        assert_eq!(request.context.reasoning_effort, Some(ReasoningEffort::Medium));
        assert_eq!(request.context.analysis_type, AnalysisType::Advice);
        assert_eq!(request.code, "fn main() {}");
    }

    #[test]
    fn test_unset_provider_and_effort_left_to_persona() {
        let request = build_request(&args("look"), &Config::default()).unwrap();
        assert!(request.provider.is_none());
        assert!(request.context.reasoning_effort.is_none());
    }

    #[test]
    fn test_strict_options_rejected() {
        let mut a = args("look");
        a.provider = Some("anthropic".to_string());
        let err = build_request(&a, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported provider: anthropic");

        let mut a = args("look");
        a.analysis = "poetry".to_string();
        assert!(build_request(&a, &Config::default()).is_err());
    }

    #[test]
    fn test_presentation_options_are_lenient() {
        let mut a = args("look");
        a.tone = Some("sarcastic".to_string());
        a.format = Some("dual".to_string());
        a.audience = Some("beginner".to_string());
        a.constraints = Some("no new dependencies".to_string());
        a.diagrams = true;

        let request = build_request(&a, &Config::default()).unwrap();

        assert_eq!(request.context.tone_style, ToneStyle::Detailed);
        assert_eq!(request.context.output_format, OutputFormat::Dual);
        assert_eq!(request.context.audience_level, AudienceLevel::Beginner);
        assert_eq!(request.context.constraints(), Some("no new dependencies"));
        assert!(request.context.include_diagrams);
    }

    #[test]
    fn test_code_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "let answer = 42;").unwrap();
        let mut a = args("look");
        a.file = Some(file.path().to_string_lossy().to_string());

        let request = build_request(&a, &Config::default()).unwrap();
        assert_eq!(request.code, "let answer = 42;");
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut a = args("look");
        a.file = Some("/nonexistent/sage/input.rs".to_string());
        let err = build_request(&a, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
