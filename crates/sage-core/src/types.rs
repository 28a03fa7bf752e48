//! Core types for Sage — request enums, chat messages, and usage statistics.
//!
//! Every enumerated option that drives prompt construction is a closed Rust
//! enum, so adding a variant is a compile error at every `match` that
//! consumes it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ─────────────────────────────────────────────
// Analysis type
// ─────────────────────────────────────────────

/// The category of task being requested. Drives prompt framing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Comprehensive,
    Advice,
    Research,
    Review,
}

impl AnalysisType {
    /// All variants, in declaration order.
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::Comprehensive,
        AnalysisType::Advice,
        AnalysisType::Research,
        AnalysisType::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Comprehensive => "comprehensive",
            AnalysisType::Advice => "advice",
            AnalysisType::Research => "research",
            AnalysisType::Review => "review",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownAnalysisType(s.to_string()))
    }
}

// ─────────────────────────────────────────────
// Reasoning effort
// ─────────────────────────────────────────────

/// Provider-forwarded hint for how hard the model should think.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    #[default]
    Medium,
    High,
}

impl ReasoningEffort {
    pub const ALL: [ReasoningEffort; 3] = [
        ReasoningEffort::Low,
        ReasoningEffort::Medium,
        ReasoningEffort::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningEffort {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReasoningEffort::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownReasoningEffort(s.to_string()))
    }
}

// ─────────────────────────────────────────────
// Provider identifier
// ─────────────────────────────────────────────

/// Identifier of a supported model backend.
///
/// Parsing is strict: an unknown name is a [`ConfigError::UnsupportedProvider`],
/// never a silent default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Xai,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Xai, ProviderId::OpenAi];

    /// Name used in config keys and provider options (e.g. `"xai"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Xai => "xai",
            ProviderId::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnsupportedProvider(s.to_string()))
    }
}

// ─────────────────────────────────────────────
// Call config
// ─────────────────────────────────────────────

/// Everything needed for exactly one model invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct CallConfig {
    pub system_prompt: String,
    pub task: String,
    pub code: String,
    pub analysis_type: AnalysisType,
    pub reasoning_effort: ReasoningEffort,
    pub provider: ProviderId,
    /// Pre-built user prompt. When `None`, the dispatcher builds one from
    /// `task`, `code`, and `analysis_type`.
    pub user_prompt: Option<String>,
}

impl CallConfig {
    pub fn new(
        system_prompt: impl Into<String>,
        task: impl Into<String>,
        code: impl Into<String>,
        analysis_type: AnalysisType,
        reasoning_effort: ReasoningEffort,
        provider: ProviderId,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            task: task.into(),
            code: code.into(),
            analysis_type,
            reasoning_effort,
            provider,
            user_prompt: None,
        }
    }

    /// Use an already-built user prompt instead of the default builder.
    pub fn with_user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }
}

// ─────────────────────────────────────────────
// Messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// A role-tagged chat message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System { content } | Message::User { content } => content,
        }
    }
}

// ─────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────

/// Token usage statistics reported by the model.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageInfo {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    /// Breakdown reported by reasoning models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CompletionTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u32,
}

impl UsageInfo {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            completion_tokens_details: None,
        }
    }

    /// Total tokens, falling back to the sum when the provider reports zero.
    pub fn total(&self) -> u32 {
        if self.total_tokens > 0 {
            self.total_tokens
        } else {
            self.prompt_tokens + self.completion_tokens
        }
    }

    /// Reasoning tokens, when the provider reports them.
    pub fn reasoning_tokens(&self) -> Option<u32> {
        self.completion_tokens_details
            .as_ref()
            .map(|d| d.reasoning_tokens)
            .filter(|n| *n > 0)
    }
}

// ─────────────────────────────────────────────
// Wire types (OpenAI-compatible chat completions)
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
///
/// Provider-specific options are flattened into the top level.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Raw chat completion response. Used internally for deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
