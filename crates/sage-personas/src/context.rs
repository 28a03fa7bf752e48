//! Request-scoped options consumed by persona transformations.
//!
//! Every enumerated option is a closed enum. Strict parsing (`FromStr`) is
//! used where a typo must be reported; `parse_lenient` falls back to the
//! default so a bad presentation option never aborts a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use sage_core::types::{AnalysisType, ReasoningEffort};

/// Error for a presentation option that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Case-insensitive lookup of `s` among `all` by display name.
fn parse_option<T: Copy>(
    all: &[T],
    name: fn(&T) -> &'static str,
    kind: &'static str,
    s: &str,
) -> Result<T, UnknownOption> {
    all.iter()
        .copied()
        .find(|v| name(v).eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| UnknownOption {
            kind,
            value: s.to_string(),
        })
}

fn log_fallback(err: &UnknownOption) {
    debug!(option = err.kind, value = %err.value, "unknown option, using default");
}

// ─────────────────────────────────────────────
// Audience level
// ─────────────────────────────────────────────

/// Who the answer is written for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceLevel {
    Beginner,
    Expert,
    #[default]
    Auto,
}

impl AudienceLevel {
    pub const ALL: [AudienceLevel; 3] = [
        AudienceLevel::Beginner,
        AudienceLevel::Expert,
        AudienceLevel::Auto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudienceLevel::Beginner => "beginner",
            AudienceLevel::Expert => "expert",
            AudienceLevel::Auto => "auto",
        }
    }

    /// Parse, falling back to the default for unrecognized input.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            log_fallback(&err);
            AudienceLevel::default()
        })
    }
}

impl fmt::Display for AudienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudienceLevel {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(&Self::ALL, Self::as_str, "audience level", s)
    }
}

// ─────────────────────────────────────────────
// Tone style
// ─────────────────────────────────────────────

/// How much personality flavours the answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneStyle {
    Concise,
    Humorous,
    Straight,
    #[default]
    Detailed,
}

impl ToneStyle {
    pub const ALL: [ToneStyle; 4] = [
        ToneStyle::Concise,
        ToneStyle::Humorous,
        ToneStyle::Straight,
        ToneStyle::Detailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToneStyle::Concise => "concise",
            ToneStyle::Humorous => "humorous",
            ToneStyle::Straight => "straight",
            ToneStyle::Detailed => "detailed",
        }
    }

    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            log_fallback(&err);
            ToneStyle::default()
        })
    }
}

impl fmt::Display for ToneStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneStyle {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(&Self::ALL, Self::as_str, "tone style", s)
    }
}

// ─────────────────────────────────────────────
// Output format
// ─────────────────────────────────────────────

/// Shape of the final answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A handful of bullet points.
    Tldr,
    /// Short summary followed by the full breakdown.
    Dual,
    #[default]
    Detailed,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Tldr,
        OutputFormat::Dual,
        OutputFormat::Detailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Tldr => "tldr",
            OutputFormat::Dual => "dual",
            OutputFormat::Detailed => "detailed",
        }
    }

    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            log_fallback(&err);
            OutputFormat::default()
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(&Self::ALL, Self::as_str, "output format", s)
    }
}

// ─────────────────────────────────────────────
// PersonaContext
// ─────────────────────────────────────────────

/// Options for one request. Only `analysis_type` is required.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonaContext {
    pub analysis_type: AnalysisType,
    /// `None` until the pipeline resolves it from the persona's preference.
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Free-text constraints from the user (deadline, team size, ...).
    pub user_constraints: Option<String>,
    pub audience_level: AudienceLevel,
    pub tone_style: ToneStyle,
    pub output_format: OutputFormat,
    pub include_diagrams: bool,
}

impl PersonaContext {
    pub fn new(analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type,
            reasoning_effort: None,
            user_constraints: None,
            audience_level: AudienceLevel::default(),
            tone_style: ToneStyle::default(),
            output_format: OutputFormat::default(),
            include_diagrams: false,
        }
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    /// An empty string is treated as absent.
    pub fn with_user_constraints(mut self, constraints: impl Into<String>) -> Self {
        let constraints = constraints.into();
        self.user_constraints = (!constraints.is_empty()).then_some(constraints);
        self
    }

    pub fn with_audience(mut self, level: AudienceLevel) -> Self {
        self.audience_level = level;
        self
    }

    pub fn with_tone(mut self, tone: ToneStyle) -> Self {
        self.tone_style = tone;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_diagrams(mut self, include: bool) -> Self {
        self.include_diagrams = include;
        self
    }

    /// Constraints text, if a non-empty value was supplied.
    pub fn constraints(&self) -> Option<&str> {
        self.user_constraints.as_deref().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = PersonaContext::new(AnalysisType::Review);
        assert_eq!(ctx.audience_level, AudienceLevel::Auto);
        assert_eq!(ctx.tone_style, ToneStyle::Detailed);
        assert_eq!(ctx.output_format, OutputFormat::Detailed);
        assert!(!ctx.include_diagrams);
        assert!(ctx.reasoning_effort.is_none());
        assert!(ctx.constraints().is_none());
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("dual".parse::<OutputFormat>().unwrap(), OutputFormat::Dual);
        assert_eq!(" Humorous".parse::<ToneStyle>().unwrap(), ToneStyle::Humorous);
        let err = "verbose".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.to_string(), "unknown output format: verbose");
    }

    #[test]
    fn test_lenient_parse_falls_back() {
        assert_eq!(ToneStyle::parse_lenient("sarcastic"), ToneStyle::Detailed);
        assert_eq!(OutputFormat::parse_lenient(""), OutputFormat::Detailed);
        assert_eq!(AudienceLevel::parse_lenient("guru"), AudienceLevel::Auto);
        assert_eq!(AudienceLevel::parse_lenient("expert"), AudienceLevel::Expert);
    }

    #[test]
    fn test_empty_constraints_are_absent() {
        let ctx = PersonaContext::new(AnalysisType::Advice).with_user_constraints("");
        assert!(ctx.constraints().is_none());
        let ctx = ctx.with_user_constraints("   ");
        assert_eq!(ctx.constraints(), Some("   "));
        let ctx = ctx.with_user_constraints("a two-person team");
        assert_eq!(ctx.constraints(), Some("a two-person team"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_value(OutputFormat::Tldr).unwrap();
        assert_eq!(json, serde_json::json!("tldr"));
    }
}
